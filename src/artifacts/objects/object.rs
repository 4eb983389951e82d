use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RevError;
use anyhow::Result;
use bytes::Bytes;
use std::io::BufRead;

/// Produces the payload bytes of an object (everything after the header)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Rebuilds an object from its payload bytes (the header has already been consumed)
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::compute(self.object_type(), &self.serialize()?))
    }
}

/// A typed payload as it travels to and from the object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    pub kind: ObjectType,
    pub payload: Bytes,
}

impl RawObject {
    pub fn new(kind: ObjectType, payload: impl Into<Bytes>) -> Self {
        RawObject {
            kind,
            payload: payload.into(),
        }
    }

    pub fn object_id(&self) -> ObjectId {
        ObjectId::compute(self.kind, &self.payload)
    }

    /// Frame the payload as `"<kind> <len>\0" + payload`
    pub fn encode(&self) -> Bytes {
        let header = self.kind.header(self.payload.len());
        let mut framed = Vec::with_capacity(header.len() + self.payload.len());
        framed.extend_from_slice(header.as_bytes());
        framed.extend_from_slice(&self.payload);

        framed.into()
    }

    /// Strip and validate the header of a framed object
    ///
    /// `oid` is only used to label errors.
    pub fn decode(oid: &ObjectId, framed: Bytes) -> Result<Self> {
        let corrupt = |reason: &str| RevError::CorruptObject(oid.to_string(), reason.to_string());

        let nul = framed
            .iter()
            .position(|byte| *byte == 0)
            .ok_or_else(|| corrupt("missing header terminator"))?;
        let header =
            std::str::from_utf8(&framed[..nul]).map_err(|_| corrupt("header is not ASCII"))?;
        let (kind, size) = header
            .split_once(' ')
            .ok_or_else(|| corrupt("malformed header"))?;

        let kind = ObjectType::try_from(kind).map_err(|_| corrupt("unknown object kind"))?;
        let size = size
            .parse::<usize>()
            .map_err(|_| corrupt("malformed payload length"))?;

        let payload = framed.slice(nul + 1..);
        if payload.len() != size {
            return Err(corrupt("payload length does not match header").into());
        }

        Ok(RawObject { kind, payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::kind_of;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn any_oid() -> ObjectId {
        ObjectId::compute(ObjectType::Blob, b"")
    }

    #[test]
    fn encode_prefixes_the_ascii_header() {
        let object = RawObject::new(ObjectType::Blob, &b"hello"[..]);
        assert_eq!(&object.encode()[..], b"blob 5\0hello");
    }

    #[test]
    fn decode_strips_the_header() {
        let decoded = RawObject::decode(&any_oid(), Bytes::from_static(b"tree 3\0a\0b")).unwrap();
        assert_eq!(decoded.kind, ObjectType::Tree);
        assert_eq!(&decoded.payload[..], b"a\0b");
    }

    #[rstest]
    #[case::no_terminator(&b"blob 5hello"[..])]
    #[case::no_space(&b"blob5\0hello"[..])]
    #[case::unknown_kind(&b"tag 5\0hello"[..])]
    #[case::bad_length(&b"blob five\0hello"[..])]
    #[case::short_payload(&b"blob 6\0hello"[..])]
    #[case::long_payload(&b"blob 4\0hello"[..])]
    fn malformed_headers_are_corrupt(#[case] framed: &'static [u8]) {
        let error = RawObject::decode(&any_oid(), Bytes::from_static(framed)).unwrap_err();
        assert!(matches!(
            kind_of(&error),
            Some(RevError::CorruptObject(_, _))
        ));
    }
}
