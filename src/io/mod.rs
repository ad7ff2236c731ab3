//! Persistence
//!
//! JSON, TOML and YAML encodings for parameter collections, chosen by file
//! extension, plus generation of Rust source that rebuilds a collection
//! through the builder API (see [`codegen`]).
pub mod codegen;
pub mod file;

pub use codegen::WriteCode;
pub use file::SetsFile;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::params::{Hypers, Params, Sel};
use crate::search::Flex;
use crate::sheet::{Sets, Sheet, SheetSets};
use crate::Result;

/// Serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.json`
    Json,
    /// `.toml`
    Toml,
    /// `.yaml` / `.yml`
    Yaml,
}

impl Format {
    /// Detects the format from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => {
                let err = std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("cannot detect format of {}", path.display()),
                );
                log::error!("{}", err);
                Err(err.into())
            }
        }
    }
}

/// Text and file round trips in every supported format.
///
/// Runtime bookkeeping (match counts, set names, histories) is never
/// written.
pub trait Persist: Serialize + DeserializeOwned {
    /// Pretty-printed JSON
    fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decodes JSON
    fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// TOML document
    fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Decodes TOML
    fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// YAML document
    fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Decodes YAML
    fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Encodes in the given format
    fn to_format_string(&self, format: Format) -> Result<String> {
        match format {
            Format::Json => self.to_json_string(),
            Format::Toml => self.to_toml_string(),
            Format::Yaml => self.to_yaml_string(),
        }
    }

    /// Decodes from the given format
    fn from_format_str(text: &str, format: Format) -> Result<Self> {
        match format {
            Format::Json => Self::from_json_str(text),
            Format::Toml => Self::from_toml_str(text),
            Format::Yaml => Self::from_yaml_str(text),
        }
    }

    /// Writes a JSON file
    fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_format(path, Format::Json)
    }

    /// Reads a JSON file
    fn open_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_format(path, Format::Json)
    }

    /// Writes a TOML file
    fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_format(path, Format::Toml)
    }

    /// Reads a TOML file
    fn open_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_format(path, Format::Toml)
    }

    /// Writes a YAML file
    fn save_yaml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_format(path, Format::Yaml)
    }

    /// Reads a YAML file
    fn open_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_format(path, Format::Yaml)
    }

    /// Writes a file in the given format
    fn save_format<P: AsRef<Path>>(&self, path: P, format: Format) -> Result<()> {
        let text = self.to_format_string(format)?;
        fs::write(path.as_ref(), text).map_err(|e| {
            log::error!("cannot write {}: {}", path.as_ref().display(), e);
            e.into()
        })
    }

    /// Reads a file in the given format
    fn open_format<P: AsRef<Path>>(path: P, format: Format) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref()).map_err(|e| {
            log::error!("cannot read {}: {}", path.as_ref().display(), e);
            crate::ParamsError::from(e)
        })?;
        Self::from_format_str(&text, format)
    }

    /// Writes a file, choosing the format by extension
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let format = Format::from_path(path.as_ref())?;
        self.save_format(path, format)
    }

    /// Reads a file, choosing the format by extension
    fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let format = Format::from_path(path.as_ref())?;
        Self::open_format(path, format)
    }
}

impl Persist for Params {}
impl Persist for Hypers {}
impl Persist for Sel {}
impl Persist for Sets {}
impl Persist for SheetSets {}
impl Persist for Flex {}

// a TOML document must be a table, so a sheet is written as `[[sel]]` entries
#[derive(Serialize)]
struct SheetTomlRef<'a> {
    sel: &'a Sheet,
}

#[derive(Deserialize)]
struct SheetToml {
    #[serde(default)]
    sel: Sheet,
}

impl Persist for Sheet {
    fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(&SheetTomlRef { sel: self })?)
    }

    fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str::<SheetToml>(text)?.sel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::HyperValues;
    use crate::sheet::{Set, Sheets};

    fn sets() -> Sets {
        Sets::from([
            (
                "Base",
                Set::new(
                    "defaults",
                    Sheets::from([(
                        "Network",
                        Sheet::from(vec![
                            Sel::new("Layer", "all layers")
                                .param("Layer.Inhib.Layer.Gi", "1.8")
                                .hyper("Layer.Inhib.Layer.Gi", HyperValues::from([("Tweak", "log")])),
                            Sel::new("#Output", "").param("Layer.Act.Clamp", "true"),
                        ]),
                    )]),
                ),
            ),
            (
                "NoMomentum",
                Set::new(
                    "",
                    Sheets::from([(
                        "Network",
                        Sheet::from(vec![Sel::new("Prjn", "").param("Prjn.Learn.Momentum.On", "false")]),
                    )]),
                ),
            ),
        ])
    }

    #[test]
    fn test_sets_round_trip_every_format() {
        let original = sets();
        for format in [Format::Json, Format::Toml, Format::Yaml] {
            let text = original.to_format_string(format).unwrap();
            let back = Sets::from_format_str(&text, format).unwrap();
            assert_eq!(back, original, "{:?}:\n{}", format, text);
        }
    }

    #[test]
    fn test_sheet_toml_uses_table_root() {
        let sheet = sets().sheet_by_name("Base", "Network").unwrap().clone();
        let text = sheet.to_toml_string().unwrap();
        assert!(text.contains("[[sel]]"));
        assert_eq!(Sheet::from_toml_str(&text).unwrap(), sheet);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path("net.yml").unwrap(), Format::Yaml);
        assert_eq!(Format::from_path("net.toml").unwrap(), Format::Toml);
        assert!(Format::from_path("net.txt").is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("paramstyle_io_{}.json", std::process::id()));
        let params = Params::from([("Layer.Act.Gain", "100"), ("Layer.Act.Dt", "0.3")]);
        params.save(&path).unwrap();
        let back = Params::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(back, params);
    }
}
