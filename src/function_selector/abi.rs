use std::fmt::Display;

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// A compiled contract artifact. Only the `abi` field is read.
#[derive(Debug, Deserialize)]
pub struct Artifact {
    pub abi: Vec<AbiItem>,
}

#[derive(Debug, Deserialize)]
pub struct AbiItem {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiInput>,
}

#[derive(Debug, Deserialize)]
pub struct AbiInput {
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub components: Option<Vec<AbiInput>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Function,
    Event,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Primitive(String),
    Tuple(Vec<ParamType>),
}

impl Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamType::Primitive(ty) => write!(f, "{ty}"),
            ParamType::Tuple(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl TryFrom<&AbiInput> for ParamType {
    type Error = anyhow::Error;

    // A non-empty `components` list always wins over `type`, so `tuple[]`
    // resolves to the bare parenthesized list without its array suffix.
    fn try_from(input: &AbiInput) -> Result<Self> {
        match &input.components {
            Some(components) if !components.is_empty() => Ok(ParamType::Tuple(
                components
                    .iter()
                    .map(ParamType::try_from)
                    .collect::<Result<_>>()?,
            )),
            _ => input
                .ty
                .clone()
                .map(ParamType::Primitive)
                .ok_or_else(|| anyhow!("input is missing its \"type\" field")),
        }
    }
}

impl AbiItem {
    /// The item's name, or `None` when absent or empty.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn kind(&self) -> Result<Option<ItemKind>> {
        match self.kind.as_deref() {
            Some("function") => Ok(Some(ItemKind::Function)),
            Some("event") => Ok(Some(ItemKind::Event)),
            Some(_) => Ok(None),
            None => Err(anyhow!(
                "item {:?} is missing its \"type\" field",
                self.name().unwrap_or_default()
            )),
        }
    }

    /// Builds `name(type1,type2,...)`. Returns `None` for unnamed items.
    pub fn signature(&self) -> Result<Option<String>> {
        let Some(name) = self.name() else {
            return Ok(None);
        };
        let params = self
            .inputs
            .iter()
            .map(|input| ParamType::try_from(input).map(|ty| ty.to_string()))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| e.context(format!("resolving inputs of {name:?}")))?;
        Ok(Some(format!("{name}({})", params.join(","))))
    }
}
