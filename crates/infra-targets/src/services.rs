//! Closed table of the MCP servers the setup tool knows how to wire.
//!
//! Each row names the config key that enables the server, the sections it
//! may be declared in (first match wins), the name it gets in each target,
//! and a builder that fills in the invocation.

use infra_config::{ConfigDocument, locate_artifact, sections};

use crate::error::{Error, Result};
use crate::schema::{Fragment, ServiceEntry, TargetKind};

const DISCORD_JAR: &str = "target/discord-mcp-0.0.1-SNAPSHOT.jar";
const DISCORD_GUILD_ID: &str = "1383848194881884262";
const GMAIL_PACKAGE: &str = "@gongrzhe/server-gmail-autoauth-mcp";

type Builder = fn(name: &str, location: &str, doc: &ConfigDocument) -> Result<ServiceEntry>;

/// One row of the service table.
pub struct ServiceDef {
    /// Config key that enables the service; its value is the service location.
    pub key: &'static str,
    /// Sections searched for `key`, in order of preference.
    pub sources: &'static [&'static str],
    pub code_name: &'static str,
    pub desktop_name: &'static str,
    /// An empty value disables the service (and moves on to the next source).
    pub empty_is_absent: bool,
    builder: Builder,
}

impl ServiceDef {
    pub fn name_for(&self, kind: TargetKind) -> &'static str {
        match kind {
            TargetKind::ClaudeCode => self.code_name,
            TargetKind::ClaudeDesktop => self.desktop_name,
        }
    }

    /// The configured location, if the service is enabled.
    pub fn location<'a>(&self, doc: &'a ConfigDocument) -> Option<&'a str> {
        self.sources.iter().find_map(|section| {
            if self.empty_is_absent {
                doc.get_non_empty(section, self.key)
            } else {
                doc.get(section, self.key)
            }
        })
    }

    pub fn build(&self, kind: TargetKind, doc: &ConfigDocument) -> Result<Option<ServiceEntry>> {
        match self.location(doc) {
            Some(location) => (self.builder)(self.name_for(kind), location, doc).map(Some),
            None => Ok(None),
        }
    }
}

pub const SERVICES: &[ServiceDef] = &[
    ServiceDef {
        key: "rag-memory",
        sources: &[sections::CORE_MCP_SERVERS],
        code_name: "rag-memory",
        desktop_name: "rag-memory",
        empty_is_absent: false,
        builder: build_rag_memory,
    },
    ServiceDef {
        key: "discord-mcp",
        sources: &[sections::CORE_MCP_SERVERS],
        code_name: "discord",
        desktop_name: "discord-mcp",
        empty_is_absent: false,
        builder: build_discord,
    },
    ServiceDef {
        key: "gmail",
        sources: &[sections::CORE_MCP_SERVERS, sections::EXTERNAL_MCP_SERVERS],
        code_name: "gmail",
        desktop_name: "gmail",
        empty_is_absent: true,
        builder: build_gmail,
    },
];

/// Build the services fragment for `kind` from a resolved config.
///
/// Services whose key is absent are skipped. Only gmail treats an empty
/// value as absent. A configured service whose
/// supporting keys are missing fails the whole fragment.
pub fn build_fragment(doc: &ConfigDocument, kind: TargetKind) -> Result<Fragment> {
    let mut fragment = Fragment::new();
    for def in SERVICES {
        match def.build(kind, doc)? {
            Some(entry) => fragment.insert(entry),
            None => tracing::debug!(service = def.key, kind = %kind, "Service not configured"),
        }
    }
    Ok(fragment)
}

fn require<'a>(doc: &'a ConfigDocument, section: &str, key: &str) -> Result<&'a str> {
    doc.get(section, key)
        .ok_or_else(|| Error::missing(section, key))
}

fn build_rag_memory(name: &str, location: &str, doc: &ConfigDocument) -> Result<ServiceEntry> {
    let personal_dir = require(doc, sections::PATHS, "PERSONAL_DIR")?;
    Ok(ServiceEntry::new(name, "node")
        .arg(locate_artifact(location))
        .env("DB_FILE_PATH", format!("{personal_dir}/rag-memory.db")))
}

fn build_discord(name: &str, location: &str, doc: &ConfigDocument) -> Result<ServiceEntry> {
    let token = require(doc, sections::CREDENTIALS, "DISCORD_TOKEN")?;
    Ok(ServiceEntry::new(name, "java")
        .arg("-jar")
        .arg(format!("{location}/{DISCORD_JAR}"))
        .env("DISCORD_TOKEN", token)
        .env("DISCORD_GUILD_ID", DISCORD_GUILD_ID))
}

fn build_gmail(name: &str, _location: &str, _doc: &ConfigDocument) -> Result<ServiceEntry> {
    Ok(ServiceEntry::new(name, "npx").arg(GMAIL_PACKAGE))
}
