//! Protocol selector and action code catalogs.
//!
//! The HARP and HOI layers both carry four-bit action codes. Only the HOI
//! meanings are confirmed, so names are offered for HOI codes alone.

/// Transport Envelope protocol ids.
pub mod transport {
    /// Pipetting traffic.
    pub const PIPETTE: u8 = 0x02;
    /// Registration traffic.
    pub const REGISTRATION: u8 = 0x03;
    /// Object discovery and HOI command traffic.
    pub const OBJECT_DISCOVERY: u8 = 0x06;
    /// Connection initialization (raw parameter records, no HARP layer).
    pub const INITIALIZATION: u8 = 0x07;

    pub fn name(id: u8) -> &'static str {
        match id {
            PIPETTE => "PIPETTE",
            REGISTRATION => "REGISTRATION",
            OBJECT_DISCOVERY => "OBJECT_DISCOVERY",
            INITIALIZATION => "INITIALIZATION",
            _ => "UNKNOWN",
        }
    }
}

/// HARP protocol selectors (what the HARP payload carries).
pub mod harp {
    pub const HOI2: u8 = 0x02;
    pub const REGISTRATION2: u8 = 0x03;
    pub const NOT_DEFINED: u8 = 0xFF;

    pub fn name(id: u8) -> &'static str {
        match id {
            HOI2 => "HOI2",
            REGISTRATION2 => "REGISTRATION2",
            NOT_DEFINED => "NOT_DEFINED",
            _ => "UNKNOWN",
        }
    }
}

/// HOI2 action codes.
pub mod hoi {
    pub const STATUS_REQUEST: u8 = 0;
    pub const STATUS_RESPONSE: u8 = 1;
    pub const STATUS_EXCEPTION: u8 = 2;
    pub const COMMAND_REQUEST: u8 = 3;
    pub const COMMAND_RESPONSE: u8 = 4;
    pub const COMMAND_EXCEPTION: u8 = 5;
    pub const COMMAND_ACK: u8 = 6;
    pub const UPSTREAM_SYSTEM_EVENT: u8 = 7;
    pub const DOWNSTREAM_SYSTEM_EVENT: u8 = 8;
    pub const EVENT: u8 = 9;
    pub const INVALID_ACTION_RESPONSE: u8 = 10;
    pub const STATUS_WARNING: u8 = 11;
    pub const COMMAND_WARNING: u8 = 12;

    pub fn action_name(code: u8) -> &'static str {
        match code {
            STATUS_REQUEST => "STATUS_REQUEST",
            STATUS_RESPONSE => "STATUS_RESPONSE",
            STATUS_EXCEPTION => "STATUS_EXCEPTION",
            COMMAND_REQUEST => "COMMAND_REQUEST",
            COMMAND_RESPONSE => "COMMAND_RESPONSE",
            COMMAND_EXCEPTION => "COMMAND_EXCEPTION",
            COMMAND_ACK => "COMMAND_ACK",
            UPSTREAM_SYSTEM_EVENT => "UPSTREAM_SYSTEM_EVENT",
            DOWNSTREAM_SYSTEM_EVENT => "DOWNSTREAM_SYSTEM_EVENT",
            EVENT => "EVENT",
            INVALID_ACTION_RESPONSE => "INVALID_ACTION_RESPONSE",
            STATUS_WARNING => "STATUS_WARNING",
            COMMAND_WARNING => "COMMAND_WARNING",
            _ => "UNKNOWN",
        }
    }

    /// True for the codes a device uses to report a failed request.
    pub fn is_exception(code: u8) -> bool {
        matches!(
            code,
            STATUS_EXCEPTION | COMMAND_EXCEPTION | INVALID_ACTION_RESPONSE
        )
    }
}

/// Registration2 action codes.
pub mod registration {
    pub const REGISTRATION_REQUEST: u16 = 0;
    pub const REGISTRATION_RESPONSE: u16 = 1;
    pub const DEREGISTRATION_REQUEST: u16 = 2;
    pub const DEREGISTRATION_RESPONSE: u16 = 3;
    pub const NODE_RESET_INDICATION: u16 = 4;
    pub const BRIDGE_REGISTRATION_REQUEST: u16 = 5;
    pub const START_NODE_IDENTIFICATION: u16 = 6;
    pub const START_NODE_IDENTIFICATION_RESPONSE: u16 = 7;
    pub const STOP_NODE_IDENTIFICATION: u16 = 8;
    pub const STOP_NODE_IDENTIFICATION_RESPONSE: u16 = 9;
    pub const LIST_OF_REGISTERED_MODULES_REQUEST: u16 = 10;
    pub const LIST_OF_REGISTERED_MODULES_RESPONSE: u16 = 11;
    pub const HARP_PROTOCOL_REQUEST: u16 = 12;
    pub const HARP_PROTOCOL_RESPONSE: u16 = 13;
    pub const HARP_NODE_REMOVED_FROM_NETWORK: u16 = 14;
    pub const LIST_OF_REGISTERED_NODES_REQUEST: u16 = 15;
    pub const LIST_OF_REGISTERED_NODES_RESPONSE: u16 = 16;

    pub fn action_name(code: u16) -> &'static str {
        match code {
            REGISTRATION_REQUEST => "REGISTRATION_REQUEST",
            REGISTRATION_RESPONSE => "REGISTRATION_RESPONSE",
            DEREGISTRATION_REQUEST => "DEREGISTRATION_REQUEST",
            DEREGISTRATION_RESPONSE => "DEREGISTRATION_RESPONSE",
            NODE_RESET_INDICATION => "NODE_RESET_INDICATION",
            BRIDGE_REGISTRATION_REQUEST => "BRIDGE_REGISTRATION_REQUEST",
            START_NODE_IDENTIFICATION => "START_NODE_IDENTIFICATION",
            START_NODE_IDENTIFICATION_RESPONSE => "START_NODE_IDENTIFICATION_RESPONSE",
            STOP_NODE_IDENTIFICATION => "STOP_NODE_IDENTIFICATION",
            STOP_NODE_IDENTIFICATION_RESPONSE => "STOP_NODE_IDENTIFICATION_RESPONSE",
            LIST_OF_REGISTERED_MODULES_REQUEST => "LIST_OF_REGISTERED_MODULES_REQUEST",
            LIST_OF_REGISTERED_MODULES_RESPONSE => "LIST_OF_REGISTERED_MODULES_RESPONSE",
            HARP_PROTOCOL_REQUEST => "HARP_PROTOCOL_REQUEST",
            HARP_PROTOCOL_RESPONSE => "HARP_PROTOCOL_RESPONSE",
            HARP_NODE_REMOVED_FROM_NETWORK => "HARP_NODE_REMOVED_FROM_NETWORK",
            LIST_OF_REGISTERED_NODES_REQUEST => "LIST_OF_REGISTERED_NODES_REQUEST",
            LIST_OF_REGISTERED_NODES_RESPONSE => "LIST_OF_REGISTERED_NODES_RESPONSE",
            _ => "UNKNOWN",
        }
    }

    /// Registration option ids.
    pub mod option {
        pub const RESERVED: u8 = 0;
        pub const HARP_NETWORK_ADDRESS: u8 = 1;
        pub const HARP_NODE_ID: u8 = 2;
        pub const HARP_MODULE_ID: u8 = 3;
        pub const HARP_OBJECT_ID: u8 = 4;
        pub const HARP_PROTOCOL_REQUEST: u8 = 5;
        pub const HARP_PROTOCOL_RESPONSE: u8 = 6;
    }
}

/// Connection-initialization parameter record ids.
pub mod connection {
    pub const CLIENT_ID: u8 = 1;
    pub const CONNECTION_TYPE: u8 = 2;
    pub const TIMEOUT: u8 = 4;

    /// Record type tag for a u16 value.
    pub const TYPE_U16: u8 = 16;

    pub fn parameter_name(id: u8) -> &'static str {
        match id {
            CLIENT_ID => "client_id",
            CONNECTION_TYPE => "connection_type",
            TIMEOUT => "timeout",
            _ => "unknown",
        }
    }
}
