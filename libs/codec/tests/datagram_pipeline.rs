//! Codec integration: a datagram flows decode → classify → encode → decode
//! through the public API, the way the capture service and reader use it.

use std::net::Ipv4Addr;

use pitchcap_codec::{
    classify_packet, decode_unit_header, decode_record, encode_record, CodecError,
    InnerMessageIter,
};
use pitchcap_types::{BinaryLogRecord, OrderStatus, PacketType, SequencedUnitHeader};
use zerocopy::AsBytes;

fn data_datagram(sequence: u32, messages: &[(u8, u8)]) -> Vec<u8> {
    let body: usize = messages.iter().map(|(len, _)| *len as usize).sum();
    let header = SequencedUnitHeader::new(
        (SequencedUnitHeader::SIZE + body) as u16,
        messages.len() as u8,
        1,
        sequence,
    );
    let mut buf = header.as_bytes().to_vec();
    for &(len, msg_type) in messages {
        buf.push(len);
        buf.push(msg_type);
        buf.resize(buf.len() + len.saturating_sub(2) as usize, 0);
    }
    buf
}

#[test]
fn datagram_survives_the_full_pipeline() {
    let datagram = data_datagram(5000, &[(34, 0x37), (30, 0x38)]);

    let header = decode_unit_header(&datagram).unwrap();
    assert_eq!(header.sequence.get(), 5000);
    assert_eq!(header.count, 2);

    let packet_type = classify_packet(header.sequence.get(), header.count, datagram.len());
    assert_eq!(packet_type, PacketType::Data);

    let stored = datagram.len().min(256);
    let record = BinaryLogRecord::new(
        1_700_000_000_000_000_000,
        1,
        header.sequence.get(),
        Ipv4Addr::new(10, 1, 2, 3),
        30501,
        datagram.len() as u16,
        header.count,
        header.unit,
        packet_type,
        OrderStatus::SequencedFirst,
        stored as u16,
    );
    let entry = encode_record(&record, &datagram[..stored]);

    let (decoded, payload, consumed) = decode_record(&entry, 0).unwrap();
    assert_eq!(consumed, entry.len());
    assert_eq!(decoded.sequence.get(), 5000);
    assert_eq!(decoded.src_addr(), Ipv4Addr::new(10, 1, 2, 3));

    // The stored payload carries the original unit header and both
    // inner-message headers.
    let inner: Vec<(u8, u8)> = InnerMessageIter::new(payload)
        .map(|m| (m.header.length, m.header.message_type))
        .collect();
    assert_eq!(inner, vec![(34, 0x37), (30, 0x38)]);
}

#[test]
fn oversized_datagram_truncates_in_log_but_keeps_wire_length() {
    let datagram = data_datagram(7000, &[(200, 0x3D), (200, 0x3D)]);
    assert!(datagram.len() > 256);

    let header = decode_unit_header(&datagram).unwrap();
    let stored = datagram.len().min(256);
    let record = BinaryLogRecord::new(
        0,
        2,
        header.sequence.get(),
        Ipv4Addr::UNSPECIFIED,
        30502,
        datagram.len() as u16,
        header.count,
        header.unit,
        PacketType::Data,
        OrderStatus::SequencedInOrder,
        stored as u16,
    );
    let entry = encode_record(&record, &datagram[..stored]);

    let (decoded, payload, _) = decode_record(&entry, 0).unwrap();
    assert_eq!(decoded.length.get() as usize, datagram.len());
    assert_eq!(payload.len(), 256);

    // A concatenation cut mid-entry reports Truncated, not a short read.
    let cut = &entry[..entry.len() - 1];
    assert!(matches!(
        decode_record(cut, 0),
        Err(CodecError::Truncated { .. })
    ));
}
