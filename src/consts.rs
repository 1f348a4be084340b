//! Gadget names and defaults shared by the composers, the annotator and the CLI.

// base gadget library
pub const REFM: &str = "REFM";
pub const AND: &str = "AND";
pub const PARITY_N: &str = "PARITY_N";
pub const PARITY_NM1: &str = "PARITY_Nm1";

// picnic composite gadgets
pub const AFFINE: &str = "AFFINE";
pub const PICNIC_AND_OFFLINE: &str = "PICNIC_AND_OFFLINE";
pub const PICNIC_AND_ONLINE: &str = "PICNIC_AND_ONLINE";
pub const SBOX_OFFLINE: &str = "SBOX_OFFLINE";
pub const SBOX_ONLINE: &str = "SBOX_ONLINE";
pub const LOWMC_ROUND_OFFLINE: &str = "LOWMC_ROUND_OFFLINE";
pub const LOWMC_ROUND_ONLINE: &str = "LOWMC_ROUND_ONLINE";

// picnic protocol
pub const PICNIC_OFFLINE: &str = "PICNIC_OFFLINE";
pub const PICNIC_ONLINE: &str = "PICNIC_ONLINE";
pub const PICNIC_MPC: &str = "PICNIC_MPC";

// kkw protocol
pub const KKW_AND_OFFLINE: &str = "KKW_AND_OFFLINE";
pub const KKW_AND_ONLINE: &str = "KKW_AND_ONLINE";

// prefix of every security claim understood by the verifier
pub const CLAIM_DIRECTIVE: &str = "para noglitch";

// extension of generated verifier files
pub const FILE_EXTENSION: &str = "mv";

// width of the LowMC S-box
pub const SBOX_WIDTH: usize = 3;

// smallest party count for which PARITY_Nm1 has two inputs
pub const MIN_PARTIES: usize = 3;

pub const DEFAULT_PARTIES: usize = 4;
pub const DEFAULT_NBITS: usize = 9;
pub const DEFAULT_ROUNDS: usize = 2;
pub const DEFAULT_MASKING: usize = 1;
