/// Every command and response ends with this character
pub const TERMINATOR: char = '#';

pub const CMD_CONNECT: &str = "CONNECT";
pub const CMD_DISCONNECT: &str = "DISCONNECT";
pub const RESPONSE_OK: &str = "OK";

pub const NUM_TRIES: usize = 3;
pub const RETRY_MILLIS: u64 = 10;

/// USB vendor ids of genuine Arduino boards and the common clone serial chips
pub const ARDUINO_VENDOR_IDS: [u16; 4] = [
    0x2341, // Arduino LLC
    0x2a03, // Arduino SRL
    0x1a86, // QinHeng CH340
    0x0403, // FTDI
];
