use std::{collections::BTreeMap, io::Write};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

/// The parts of a build artifact describing storage layout.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub storage_layout: Option<StorageLayout>,
}

#[derive(Debug, Deserialize)]
pub struct StorageLayout {
    #[serde(default)]
    pub types: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
pub struct TypeEntry {
    pub label: String,
    #[serde(default)]
    pub members: Vec<Member>,
}

/// A struct member. `offset` counts bytes from the right end of the slot.
#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub label: String,
    pub slot: String,
    pub offset: u64,
    #[serde(rename = "type")]
    pub ty: String,
}

/// A member placed by its byte range counted from the left end of the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub label: String,
    pub start: i64,
    pub end: i64,
}

/// Byte width of a packable value type, or `None` for anything else.
pub fn byte_length(ty: &str) -> Option<i64> {
    let ty = ty.replacen("t_", "", 1);
    if ty == "bool" {
        return Some(1);
    }
    let bits = ty.strip_prefix("uint")?;
    let digits: String = bits.chars().take_while(char::is_ascii_digit).collect();
    let length = digits.parse::<i64>().ok()? / 8;
    (length > 0).then_some(length)
}

pub fn place(member: &Member) -> Option<Placement> {
    let length = byte_length(&member.ty)?;
    let start = 32 - member.offset as i64 - length;
    Some(Placement {
        label: member.label.clone(),
        start,
        end: start + length,
    })
}

/// Finds the struct labelled `struct <name>` (case-insensitive).
pub fn find_struct(artifact: &Artifact, name: &str) -> Result<TypeEntry> {
    let types = artifact
        .storage_layout
        .as_ref()
        .and_then(|layout| layout.types.as_ref())
        .ok_or_else(|| anyhow!("no storage layout found; enable it in the compiler output"))?;

    let wanted = format!("struct {}", name.to_lowercase());
    for (key, value) in types {
        let entry: TypeEntry = serde_json::from_value(value.clone())
            .with_context(|| format!("decoding storage type {key}"))?;
        if entry.label.to_lowercase() == wanted {
            return Ok(entry);
        }
    }
    Err(anyhow!("struct {name} not found"))
}

/// Groups placed members by slot in ascending slot order. Within a slot the
/// members are listed from the left end, i.e. reversed from layout order.
pub fn slots(members: &[Member]) -> Result<BTreeMap<u64, Vec<Placement>>> {
    let mut by_slot: BTreeMap<u64, Vec<Placement>> = BTreeMap::new();
    for member in members {
        let Some(placement) = place(member) else {
            continue;
        };
        let slot = member
            .slot
            .parse::<u64>()
            .with_context(|| format!("invalid slot {:?} for {}", member.slot, member.label))?;
        by_slot.entry(slot).or_default().push(placement);
    }
    for placements in by_slot.values_mut() {
        placements.reverse();
    }
    Ok(by_slot)
}

pub fn write_layout(
    writer: &mut impl Write,
    struct_name: &str,
    contract_name: &str,
    by_slot: &BTreeMap<u64, Vec<Placement>>,
) -> std::io::Result<()> {
    writeln!(writer, "Struct {struct_name} in {contract_name}")?;
    writeln!(writer, "Members:")?;
    for (slot, placements) in by_slot {
        for Placement { label, start, end } in placements {
            writeln!(writer, "  Slot {slot} @ [{start}:{end}] | {label}")?;
        }
    }
    Ok(())
}
