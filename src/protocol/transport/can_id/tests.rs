//! Unit tests for the `CanId` accessors and builder.
use super::*;

fn subject(raw: u16) -> SubjectId {
    SubjectId::new(raw).expect("valid subject")
}

fn node(raw: u8) -> NodeId {
    NodeId::new(raw).expect("valid node")
}

//==================================================================================CAN_ID
#[test]
/// Heartbeat from node 42 at nominal priority packs into the documented layout.
fn test_heartbeat_identifier_layout() {
    let can_id = CanId::builder(subject(32085), node(42)).build();
    assert_eq!(can_id.0, 0x107D_552A);
}

#[test]
/// Distance subject packs below the heartbeat without touching reserved bits.
fn test_distance_identifier_layout() {
    let can_id = CanId::builder(subject(1610), node(42)).build();
    assert_eq!(can_id.0, 0x1006_4A2A);
    assert!(can_id.is_message());
    assert!(!can_id.is_anonymous());
}

#[test]
/// Accessors recover every field written by the builder.
fn test_accessors_roundtrip_fields() {
    let can_id = CanId::builder(subject(0x7FFF), node(127))
        .with_priority(Priority::Optional)
        .build();

    assert_eq!(can_id.priority(), Priority::Optional);
    assert_eq!(can_id.subject_id().get(), 0x7FFF);
    assert_eq!(can_id.source().get(), 127);
    assert_eq!(can_id.0 & !0x1FFF_FFFF, 0, "identifier must stay within 29 bits");
}

#[test]
/// Service frames and reserved bits are not reported as messages.
fn test_is_message_rejects_service_and_reserved_bits() {
    assert!(!CanId(0x107D_552A | (1 << 25)).is_message());
    assert!(!CanId(0x107D_552A | (1 << 23)).is_message());
    assert!(!CanId(0x107D_552A | (1 << 7)).is_message());
}

#[test]
/// Conversion into `embedded-can` keeps the raw value.
fn test_extended_id_conversion() {
    let can_id = CanId::builder(subject(1610), node(5)).build();
    let extended = can_id.to_extended_id();
    assert_eq!(extended.as_raw(), can_id.0);
    assert_eq!(CanId::from(extended), can_id);
}

//==================================================================================VALIDATION
#[test]
/// Out-of-range identifiers are refused by the newtypes.
fn test_out_of_range_identifiers() {
    assert!(SubjectId::new(0x8000).is_err());
    assert!(NodeId::new(128).is_err());
    assert_eq!(SubjectId::from_truncating(0xFFFF).get(), 0x7FFF);
}
