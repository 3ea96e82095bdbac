/// Universal-class tag numbers from X.680 §8.4.
///
/// Unknown values are captured by `Unknown(u64)`; they still decode
/// structurally and materialize as `[UNIVERSAL n]`.
///
/// ```text
/// ┌──────┬──────────────────┐    ┌──────┬──────────────────┐
/// │ Tag  │ Variant          │    │ Tag  │ Variant          │
/// ├──────┼──────────────────┤    ├──────┼──────────────────┤
/// │ 0    │ EndOfContents    │    │ 16   │ Sequence         │
/// │ 1    │ Boolean          │    │ 17   │ Set              │
/// │ 2    │ Integer          │    │ 18   │ NumericString    │
/// │ 3    │ BitString        │    │ 19   │ PrintableString  │
/// │ 4    │ OctetString      │    │ 20   │ TeletexString    │
/// │ 5    │ Null             │    │ 21   │ VideotexString   │
/// │ 6    │ ObjectIdentifier │    │ 22   │ Ia5String        │
/// │ 7    │ ObjectDescriptor │    │ 23   │ UtcTime          │
/// │ 8    │ External         │    │ 24   │ GeneralizedTime  │
/// │ 9    │ Real             │    │ 25   │ GraphicString    │
/// │ 10   │ Enumerated       │    │ 26   │ VisibleString    │
/// │ 11   │ EmbeddedPdv      │    │ 27   │ GeneralString    │
/// │ 12   │ Utf8String       │    │ 28   │ UniversalString  │
/// │ 13   │ RelativeOid      │    │ 29   │ CharacterString  │
/// │      │                  │    │ 30   │ BmpString        │
/// └──────┴──────────────────┘    └──────┴──────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniversalTag {
    EndOfContents,
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    ObjectDescriptor,
    External,
    Real,
    Enumerated,
    EmbeddedPdv,
    Utf8String,
    RelativeOid,
    Sequence,
    Set,
    NumericString,
    PrintableString,
    TeletexString,
    VideotexString,
    Ia5String,
    UtcTime,
    GeneralizedTime,
    GraphicString,
    VisibleString,
    GeneralString,
    UniversalString,
    CharacterString,
    BmpString,
    Unknown(u64),
}

impl UniversalTag {
    pub fn from_number(number: u64) -> Self {
        match number {
            0 => Self::EndOfContents,
            1 => Self::Boolean,
            2 => Self::Integer,
            3 => Self::BitString,
            4 => Self::OctetString,
            5 => Self::Null,
            6 => Self::ObjectIdentifier,
            7 => Self::ObjectDescriptor,
            8 => Self::External,
            9 => Self::Real,
            10 => Self::Enumerated,
            11 => Self::EmbeddedPdv,
            12 => Self::Utf8String,
            13 => Self::RelativeOid,
            16 => Self::Sequence,
            17 => Self::Set,
            18 => Self::NumericString,
            19 => Self::PrintableString,
            20 => Self::TeletexString,
            21 => Self::VideotexString,
            22 => Self::Ia5String,
            23 => Self::UtcTime,
            24 => Self::GeneralizedTime,
            25 => Self::GraphicString,
            26 => Self::VisibleString,
            27 => Self::GeneralString,
            28 => Self::UniversalString,
            29 => Self::CharacterString,
            30 => Self::BmpString,
            other => Self::Unknown(other),
        }
    }

    pub fn number(self) -> u64 {
        match self {
            Self::EndOfContents => 0,
            Self::Boolean => 1,
            Self::Integer => 2,
            Self::BitString => 3,
            Self::OctetString => 4,
            Self::Null => 5,
            Self::ObjectIdentifier => 6,
            Self::ObjectDescriptor => 7,
            Self::External => 8,
            Self::Real => 9,
            Self::Enumerated => 10,
            Self::EmbeddedPdv => 11,
            Self::Utf8String => 12,
            Self::RelativeOid => 13,
            Self::Sequence => 16,
            Self::Set => 17,
            Self::NumericString => 18,
            Self::PrintableString => 19,
            Self::TeletexString => 20,
            Self::VideotexString => 21,
            Self::Ia5String => 22,
            Self::UtcTime => 23,
            Self::GeneralizedTime => 24,
            Self::GraphicString => 25,
            Self::VisibleString => 26,
            Self::GeneralString => 27,
            Self::UniversalString => 28,
            Self::CharacterString => 29,
            Self::BmpString => 30,
            Self::Unknown(n) => n,
        }
    }

    /// ASN.1 type name as it appears in materialized text.
    pub fn name(self) -> &'static str {
        match self {
            Self::EndOfContents => "END-OF-CONTENTS",
            Self::Boolean => "BOOLEAN",
            Self::Integer => "INTEGER",
            Self::BitString => "BIT STRING",
            Self::OctetString => "OCTET STRING",
            Self::Null => "NULL",
            Self::ObjectIdentifier => "OBJECT IDENTIFIER",
            Self::ObjectDescriptor => "ObjectDescriptor",
            Self::External => "EXTERNAL",
            Self::Real => "REAL",
            Self::Enumerated => "ENUMERATED",
            Self::EmbeddedPdv => "EMBEDDED PDV",
            Self::Utf8String => "UTF8String",
            Self::RelativeOid => "RELATIVE-OID",
            Self::Sequence => "SEQUENCE",
            Self::Set => "SET",
            Self::NumericString => "NumericString",
            Self::PrintableString => "PrintableString",
            Self::TeletexString => "TeletexString",
            Self::VideotexString => "VideotexString",
            Self::Ia5String => "IA5String",
            Self::UtcTime => "UTCTime",
            Self::GeneralizedTime => "GeneralizedTime",
            Self::GraphicString => "GraphicString",
            Self::VisibleString => "VisibleString",
            Self::GeneralString => "GeneralString",
            Self::UniversalString => "UniversalString",
            Self::CharacterString => "CHARACTER STRING",
            Self::BmpString => "BMPString",
            Self::Unknown(_) => "UNIVERSAL",
        }
    }

    /// Types X.690 only permits in primitive form.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Boolean
                | Self::Integer
                | Self::Null
                | Self::ObjectIdentifier
                | Self::Real
                | Self::Enumerated
                | Self::RelativeOid
        )
    }

    /// String types that BER may split into constructed segments.
    pub fn is_string(self) -> bool {
        matches!(
            self,
            Self::BitString
                | Self::OctetString
                | Self::ObjectDescriptor
                | Self::Utf8String
                | Self::NumericString
                | Self::PrintableString
                | Self::TeletexString
                | Self::VideotexString
                | Self::Ia5String
                | Self::UtcTime
                | Self::GeneralizedTime
                | Self::GraphicString
                | Self::VisibleString
                | Self::GeneralString
                | Self::UniversalString
                | Self::BmpString
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_map_back_and_forth() {
        for n in 0..=40 {
            assert_eq!(UniversalTag::from_number(n).number(), n);
        }
    }

    #[test]
    fn reserved_numbers_are_unknown() {
        assert_eq!(UniversalTag::from_number(14), UniversalTag::Unknown(14));
        assert_eq!(UniversalTag::from_number(15), UniversalTag::Unknown(15));
        assert_eq!(UniversalTag::from_number(31), UniversalTag::Unknown(31));
    }

    #[test]
    fn scalar_and_string_are_disjoint() {
        for n in 0..=30 {
            let tag = UniversalTag::from_number(n);
            assert!(!(tag.is_scalar() && tag.is_string()), "{tag:?}");
        }
    }
}
