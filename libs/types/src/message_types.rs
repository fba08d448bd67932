//! Registry of known inner message types.
//!
//! The capture pipeline never looks inside message bodies; this table exists
//! so the reader can annotate inner-message headers with a name and so the
//! statistics pass can label its top-types output.

/// Static description of one known inner message type.
#[derive(Debug, Clone, Copy)]
pub struct MessageTypeInfo {
    pub type_id: u8,
    pub name: &'static str,
    pub description: &'static str,
    /// Smallest valid encoding of this message, header included.
    pub min_length: u8,
}

pub const MESSAGE_TYPES: &[MessageTypeInfo] = &[
    MessageTypeInfo { type_id: 0x97, name: "UNIT_CLEAR", description: "Unit Clear", min_length: 2 },
    MessageTypeInfo { type_id: 0x3B, name: "TRADING_STATUS", description: "Trading Status", min_length: 8 },
    MessageTypeInfo { type_id: 0x37, name: "ADD_ORDER", description: "Add Order", min_length: 34 },
    MessageTypeInfo { type_id: 0x38, name: "ORDER_EXECUTED", description: "Order Executed", min_length: 30 },
    MessageTypeInfo { type_id: 0x58, name: "ORDER_EXECUTED_AT_PRICE", description: "Order Executed at Price", min_length: 38 },
    MessageTypeInfo { type_id: 0x39, name: "REDUCE_SIZE", description: "Reduce Size", min_length: 18 },
    MessageTypeInfo { type_id: 0x3A, name: "MODIFY_ORDER", description: "Modify Order", min_length: 34 },
    MessageTypeInfo { type_id: 0x3C, name: "DELETE_ORDER", description: "Delete Order", min_length: 18 },
    MessageTypeInfo { type_id: 0x3D, name: "TRADE", description: "Trade", min_length: 42 },
    MessageTypeInfo { type_id: 0x3E, name: "TRADE_BREAK", description: "Trade Break", min_length: 18 },
    MessageTypeInfo { type_id: 0xE3, name: "CALCULATED_VALUE", description: "Calculated Value", min_length: 26 },
    MessageTypeInfo { type_id: 0x2D, name: "END_OF_SESSION", description: "End of Session", min_length: 2 },
    MessageTypeInfo { type_id: 0x59, name: "AUCTION_UPDATE", description: "Auction Update", min_length: 30 },
    MessageTypeInfo { type_id: 0x5A, name: "AUCTION_SUMMARY", description: "Auction Summary", min_length: 30 },
    MessageTypeInfo { type_id: 0x01, name: "LOGIN", description: "Login", min_length: 44 },
    MessageTypeInfo { type_id: 0x02, name: "LOGIN_RESPONSE", description: "Login Response", min_length: 3 },
    MessageTypeInfo { type_id: 0x03, name: "GAP_REQUEST", description: "Gap Request", min_length: 20 },
    MessageTypeInfo { type_id: 0x04, name: "GAP_RESPONSE", description: "Gap Response", min_length: 20 },
    MessageTypeInfo { type_id: 0x80, name: "SPIN_IMAGE_AVAILABLE", description: "Spin Image Available", min_length: 20 },
    MessageTypeInfo { type_id: 0x81, name: "SPIN_REQUEST", description: "Spin Request", min_length: 20 },
    MessageTypeInfo { type_id: 0x82, name: "SPIN_RESPONSE", description: "Spin Response", min_length: 20 },
    MessageTypeInfo { type_id: 0x83, name: "SPIN_FINISHED", description: "Spin Finished", min_length: 20 },
];

/// Look up a known message type by id.
pub fn lookup_message_type(type_id: u8) -> Option<&'static MessageTypeInfo> {
    MESSAGE_TYPES.iter().find(|info| info.type_id == type_id)
}

/// Printable name for a message-type byte; "UNKNOWN" for unregistered ids.
pub fn message_type_name(type_id: u8) -> &'static str {
    lookup_message_type(type_id).map_or("UNKNOWN", |info| info.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_and_unknown() {
        let add_order = lookup_message_type(0x37).unwrap();
        assert_eq!(add_order.name, "ADD_ORDER");
        assert_eq!(add_order.min_length, 34);
        assert!(lookup_message_type(0xFF).is_none());
        assert_eq!(message_type_name(0x3D), "TRADE");
        assert_eq!(message_type_name(0xFF), "UNKNOWN");
    }

    #[test]
    fn type_ids_are_unique() {
        for (i, a) in MESSAGE_TYPES.iter().enumerate() {
            for b in &MESSAGE_TYPES[i + 1..] {
                assert_ne!(a.type_id, b.type_id);
            }
        }
    }
}
