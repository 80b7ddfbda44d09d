//! Three-phase marshalling contract
//!
//! NDR places every fixed-size ("direct") representation of a structure or
//! array first, then appends the referents of its embedded pointers in
//! declaration order. Decoding therefore runs in phases:
//!
//! 1. **Preamble** - conformance or union discriminant that precedes the entity
//! 2. **Entity** - fixed-size members; pointers contribute only a referent id
//! 3. **Deferrals** - the referents named during the entity phase
//!
//! A container holding several entities runs the entity phase of all of them
//! before the deferral phase of any of them, which is what
//! [`read_entities`] and [`write_entities`] do.

use crate::error::{NdrError, Result};
use crate::input::PacketInput;
use crate::output::PacketOutput;

/// A type decoded from NDR in three phases
pub trait Unmarshallable {
    fn unmarshal_preamble(&mut self, input: &mut PacketInput) -> Result<()>;

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()>;

    fn unmarshal_deferrals(&mut self, input: &mut PacketInput) -> Result<()>;
}

/// A type encoded to NDR in three phases
pub trait Marshallable {
    fn marshal_preamble(&self, output: &mut PacketOutput) -> Result<()>;

    fn marshal_entity(&self, output: &mut PacketOutput) -> Result<()>;

    fn marshal_deferrals(&self, output: &mut PacketOutput) -> Result<()>;
}

/// Decode sibling entities: every preamble and entity, then every deferral
pub fn read_entities<T: Unmarshallable>(input: &mut PacketInput, entities: &mut [T]) -> Result<()> {
    for entity in entities.iter_mut() {
        entity.unmarshal_preamble(input)?;
        entity.unmarshal_entity(input)?;
    }
    for entity in entities.iter_mut() {
        entity.unmarshal_deferrals(input)?;
    }
    Ok(())
}

/// Encode sibling entities: every preamble and entity, then every deferral
pub fn write_entities<T: Marshallable>(output: &mut PacketOutput, entities: &[T]) -> Result<()> {
    for entity in entities {
        entity.marshal_preamble(output)?;
        entity.marshal_entity(output)?;
    }
    for entity in entities {
        entity.marshal_deferrals(output)?;
    }
    Ok(())
}

/// Decode the referent of a counted array pointer
///
/// `declared` is the element count carried by the owning structure (for
/// example `EntriesRead`). The conformant `max_count` on the wire must agree
/// with it, and the stub must carry every declared element; a stub that runs
/// out part way through is reported against `field` rather than returning a
/// shorter sequence.
///
/// Every element occupies at least one byte, so a count larger than the rest
/// of the stub is rejected before anything is allocated for it.
pub fn read_counted_array<T>(input: &mut PacketInput, field: &'static str, declared: usize) -> Result<Vec<T>>
where
    T: Unmarshallable + Default,
{
    let max_count = input.read_conformant_count(field)?;
    if max_count != declared {
        return Err(NdrError::structure(
            field,
            format!(
                "declared {} elements but conformant max_count is {}",
                declared, max_count
            ),
        ));
    }
    if declared > input.remaining() {
        return Err(NdrError::structure(
            field,
            format!(
                "declared {} elements but only {} bytes remain",
                declared,
                input.remaining()
            ),
        ));
    }

    let mut elements: Vec<T> = (0..declared).map(|_| T::default()).collect();
    read_entities(input, &mut elements).map_err(|err| {
        if err.is_underrun() {
            NdrError::structure(
                field,
                format!(
                    "declared {} elements but the stub ends at offset {}",
                    declared,
                    input.position()
                ),
            )
        } else {
            err
        }
    })?;
    Ok(elements)
}

/// Encode the referent of a counted array pointer
pub fn write_counted_array<T: Marshallable>(output: &mut PacketOutput, elements: &[T]) -> Result<()> {
    output.write_conformant_count(elements.len());
    write_entities(output, elements)
}

/// Check a count field that must equal the number of decoded elements
pub fn check_count(field: &'static str, declared: usize, actual: usize) -> Result<()> {
    if declared != actual {
        return Err(NdrError::structure(
            field,
            format!("declared {} but {} elements present", declared, actual),
        ));
    }
    Ok(())
}
