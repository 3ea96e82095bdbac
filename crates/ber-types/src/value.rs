use ber_wire::{Class, Identifier};

use crate::contents::ContentsReader;
use crate::error::TypeError;
use crate::render;
use crate::tag::UniversalTag;

/// Nesting limit used by [`Value::materialize`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// One top-level value produced by the streaming decoder.
///
/// The identifier and length octets have been read and the contents are
/// fully buffered, but nothing inside the contents has been interpreted
/// yet. Constructed contents in particular stay as raw bytes: their
/// children are only walked, and therefore only validated, when the value
/// is materialized.
///
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │ Value                                            │
/// │   identifier: Identifier ← class, P/C, number    │
/// │   contents:   Vec<u8>    ← raw, lazily parsed    │
/// │   indefinite: bool       ← came in 0x80 form     │
/// └──────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Value {
    pub identifier: Identifier,
    pub contents: Vec<u8>,
    pub indefinite: bool,
}

impl Value {
    #[must_use]
    pub fn new(identifier: Identifier, contents: Vec<u8>, indefinite: bool) -> Self {
        Self {
            identifier,
            contents,
            indefinite,
        }
    }

    /// The universal tag, if this is a universal-class value.
    #[must_use]
    pub fn universal_tag(&self) -> Option<UniversalTag> {
        (self.identifier.class == Class::Universal)
            .then(|| UniversalTag::from_number(self.identifier.tag_number))
    }

    #[must_use]
    pub fn is_constructed(&self) -> bool {
        self.identifier.constructed
    }

    /// Reader over the nested TLVs of a constructed value.
    #[must_use]
    pub fn children(&self, max_depth: usize) -> ContentsReader<'_> {
        ContentsReader::new(&self.contents, 1, max_depth)
    }

    /// Render the value, and everything nested inside it, to canonical text.
    ///
    /// Uses [`DEFAULT_MAX_DEPTH`] as the nesting limit.
    ///
    /// # Errors
    ///
    /// Any [`TypeError`] found while validating the contents.
    pub fn materialize(&self) -> Result<String, TypeError> {
        self.materialize_with(DEFAULT_MAX_DEPTH)
    }

    /// Render the value to canonical text with an explicit nesting limit.
    ///
    /// This is where lazily-held sub-structures get checked: a constructed
    /// value whose children are truncated or break their type's rules
    /// decodes fine at the top level and only fails here.
    ///
    /// # Errors
    ///
    /// Any [`TypeError`] found while validating the contents.
    pub fn materialize_with(&self, max_depth: usize) -> Result<String, TypeError> {
        let mut out = String::new();
        render::render_tlv(self.identifier, &self.contents, 0, max_depth, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(first_octet: u8, contents: &[u8]) -> Value {
        let (identifier, _) = Identifier::read_from(&[first_octet]).unwrap();
        Value::new(identifier, contents.to_vec(), false)
    }

    #[test]
    fn universal_tag_only_for_universal_class() {
        assert_eq!(value(0x01, &[0x00]).universal_tag(), Some(UniversalTag::Boolean));
        assert_eq!(value(0x81, &[0x00]).universal_tag(), None);
    }

    #[test]
    fn materialize_boolean_false() {
        assert_eq!(value(0x01, &[0x00]).materialize().unwrap(), "BOOLEAN FALSE");
    }

    #[test]
    fn lazy_child_error_surfaces_on_materialize() {
        // SEQUENCE { BOOLEAN with two contents octets }
        let seq = value(0x30, &[0x01, 0x02, 0x00, 0x00]);
        assert!(seq.children(DEFAULT_MAX_DEPTH).next_tlv().is_ok());
        assert!(matches!(
            seq.materialize(),
            Err(TypeError::InvalidBoolean { len: 2 })
        ));
    }

    #[test]
    fn depth_limit_applies() {
        // SEQUENCE { SEQUENCE { NULL } }
        let seq = value(0x30, &[0x30, 0x02, 0x05, 0x00]);
        assert!(seq.materialize_with(2).is_ok());
        assert!(matches!(
            seq.materialize_with(1),
            Err(TypeError::NestingTooDeep { limit: 1 })
        ));
    }
}
