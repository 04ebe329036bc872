/// Largest payload that fits a single UDP datagram without fragmentation on
/// common paths (576 byte IPv4 minimum reassembly size minus headers).
pub const MTU_SIZE_BYTES: usize = 508;
pub const MTU_SIZE_BITS: u32 = (MTU_SIZE_BYTES * 8) as u32;
