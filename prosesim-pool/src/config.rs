//! Pool configuration model
//!
//! Typed, immutable descriptions of sidelink resource pools as delivered by
//! the RRC/configuration layer. A pool object is built once from one of these
//! records; reconfiguration replaces the whole pool.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

/// Cyclic prefix length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CyclicPrefix {
    /// Normal cyclic prefix
    #[default]
    Normal,
    /// Extended cyclic prefix
    Extended,
}

/// Sidelink control period length (standard-defined set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlPeriod {
    /// 40 subframes
    Sf40,
    /// 60 subframes
    Sf60,
    /// 70 subframes
    Sf70,
    /// 80 subframes
    Sf80,
    /// 120 subframes
    Sf120,
    /// 140 subframes
    Sf140,
    /// 160 subframes
    Sf160,
    /// 240 subframes
    Sf240,
    /// 280 subframes
    Sf280,
    /// 320 subframes
    Sf320,
}

impl SlPeriod {
    /// Period length in subframes
    pub fn subframes(&self) -> u32 {
        match self {
            SlPeriod::Sf40 => 40,
            SlPeriod::Sf60 => 60,
            SlPeriod::Sf70 => 70,
            SlPeriod::Sf80 => 80,
            SlPeriod::Sf120 => 120,
            SlPeriod::Sf140 => 140,
            SlPeriod::Sf160 => 160,
            SlPeriod::Sf240 => 240,
            SlPeriod::Sf280 => 280,
            SlPeriod::Sf320 => 320,
        }
    }
}

/// Discovery period length (standard-defined set, in frames)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscPeriod {
    /// 32 frames
    Rf32,
    /// 64 frames
    Rf64,
    /// 128 frames
    Rf128,
    /// 256 frames
    Rf256,
    /// 512 frames
    Rf512,
    /// 1024 frames
    Rf1024,
}

impl DiscPeriod {
    /// Period length in subframes
    pub fn subframes(&self) -> u32 {
        match self {
            DiscPeriod::Rf32 => 320,
            DiscPeriod::Rf64 => 640,
            DiscPeriod::Rf128 => 1280,
            DiscPeriod::Rf256 => 2560,
            DiscPeriod::Rf512 => 5120,
            DiscPeriod::Rf1024 => 10240,
        }
    }
}

/// Time-domain subframe bitmap, index 0 is the first subframe of the period
/// (most significant bit as broadcast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubframeBitmap(BitVec<u8, Msb0>);

impl SubframeBitmap {
    /// Builds a bitmap from a `'0'`/`'1'` string, left bit first.
    ///
    /// # Panics
    ///
    /// Panics on any character other than `'0'` or `'1'`.
    pub fn from_bits(bits: &str) -> Self {
        let mut bv = BitVec::with_capacity(bits.len());
        for c in bits.chars() {
            match c {
                '0' => bv.push(false),
                '1' => bv.push(true),
                _ => panic!("invalid bitmap character: {c}"),
            }
        }
        Self(bv)
    }

    /// Bitmap length in subframes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the bitmap has no bits
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the bit at `index` is set; false past the end.
    pub fn is_set(&self, index: usize) -> bool {
        self.0.get(index).map(|b| *b).unwrap_or(false)
    }

    /// Number of set bits
    pub fn popcount(&self) -> usize {
        self.0.count_ones()
    }
}

/// Time and frequency resource configuration shared by all three channels.
///
/// The PRB range is two-sided: a pool occupies `prb_num` blocks starting at
/// `prb_start` and `prb_num` blocks ending at `prb_end`; anything in between
/// is outside the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TfResourceConfig {
    /// First PRB of the lower band
    pub prb_start: u8,
    /// PRBs per band
    pub prb_num: u8,
    /// Last PRB of the upper band
    pub prb_end: u8,
    /// Period offset indicator in subframes
    pub offset: u32,
    /// Subframes of the period carrying the channel
    pub subframe_bitmap: SubframeBitmap,
}

impl TfResourceConfig {
    /// True if PRB `i` lies in one of the two bands of the pool.
    pub fn rb_in_pool(&self, i: u32) -> bool {
        let i = i as i32;
        let start = self.prb_start as i32;
        let num = self.prb_num as i32;
        let end = self.prb_end as i32;
        if (i >= start + num && i <= end - num) || i < start || i > end {
            return false;
        }
        true
    }

    /// PRBs of the two-sided pool, lower band first.
    pub fn pool_rbs(&self) -> Vec<u8> {
        let mut rbs = Vec::new();
        for i in self.prb_start..=self.prb_end {
            if self.rb_in_pool(i as u32) {
                rbs.push(i);
            }
        }
        rbs
    }
}

/// Frequency hopping mode for the data channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoppingInfo {
    /// Type 1 hopping, variant 0 (`+floor(n/4)`)
    Type1Variant0,
    /// Type 1 hopping, variant 1 (`-floor(n/4)`)
    Type1Variant1,
    /// Type 1 hopping, variant 2 (`+floor(n/2)`)
    Type1Variant2,
    /// Type 2 (subband) hopping
    Type2,
    /// Hopping disabled
    #[default]
    Disabled,
}

impl HoppingInfo {
    /// True for any of the three type-1 variants
    pub fn is_type1(&self) -> bool {
        matches!(
            self,
            HoppingInfo::Type1Variant0 | HoppingInfo::Type1Variant1 | HoppingInfo::Type1Variant2
        )
    }

    /// True unless hopping is disabled
    pub fn is_enabled(&self) -> bool {
        !matches!(self, HoppingInfo::Disabled)
    }
}

/// Data-channel frequency hopping configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HoppingConfig {
    /// Hopping mode
    pub info: HoppingInfo,
    /// Resource block offset (rounded up to even when applied)
    pub rb_offset: u8,
    /// Number of subbands (type 2 only)
    pub num_subbands: u8,
}

/// Permitted time-repetition-pattern repetition counts.
///
/// One flag per k in {1, 2, 4}; k=8 patterns are always permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrptSubset {
    /// k=1 patterns permitted
    pub k1: bool,
    /// k=2 patterns permitted
    pub k2: bool,
    /// k=4 patterns permitted
    pub k4: bool,
}

impl Default for TrptSubset {
    fn default() -> Self {
        // all pattern lengths available
        Self {
            k1: true,
            k2: true,
            k4: true,
        }
    }
}

impl TrptSubset {
    /// True if patterns with `k` repetitions may be used.
    pub fn permits(&self, k: u8) -> bool {
        match k {
            1 => self.k1,
            2 => self.k2,
            4 => self.k4,
            8 => true,
            _ => false,
        }
    }
}

/// UE-selected section of a communication pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UeSelectedConfig {
    /// Data-channel time/frequency resources
    pub data_tf: TfResourceConfig,
    /// Optional repetition-pattern restriction; absent means all permitted
    pub trpt_subset: Option<TrptSubset>,
}

/// Network-signalled communication pool.
///
/// Presence of the UE-selected section decides the pool type: with it the UE
/// picks its own data resources, without it the pool is network scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommPoolConfig {
    /// Control-channel cyclic prefix
    pub sc_cp_len: CyclicPrefix,
    /// Control period length
    pub sc_period: SlPeriod,
    /// Control-channel time/frequency resources
    pub sc_tf: TfResourceConfig,
    /// Data-channel cyclic prefix
    pub data_cp_len: CyclicPrefix,
    /// Data-channel hopping configuration
    pub data_hopping: HoppingConfig,
    /// UE-selected section, absent for scheduled pools
    pub ue_selected: Option<UeSelectedConfig>,
}

/// Preconfigured (out-of-coverage) communication pool; always UE selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreconfigCommPool {
    /// Control-channel cyclic prefix
    pub sc_cp_len: CyclicPrefix,
    /// Control period length
    pub sc_period: SlPeriod,
    /// Control-channel time/frequency resources
    pub sc_tf: TfResourceConfig,
    /// Data-channel cyclic prefix
    pub data_cp_len: CyclicPrefix,
    /// Data-channel hopping configuration
    pub data_hopping: HoppingConfig,
    /// Data-channel time/frequency resources
    pub data_tf: TfResourceConfig,
    /// Repetition-pattern restriction
    pub trpt_subset: TrptSubset,
}

/// Transmission probability for UE-selected discovery announcements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TxProbability {
    /// 25 %
    P25,
    /// 50 %
    P50,
    /// 75 %
    P75,
    /// 100 %
    #[default]
    P100,
}

impl TxProbability {
    /// Probability as an integer percentage
    pub fn as_percent(&self) -> u32 {
        match self {
            TxProbability::P25 => 25,
            TxProbability::P50 => 50,
            TxProbability::P75 => 75,
            TxProbability::P100 => 100,
        }
    }

    /// Maps 25/50/75 to the matching value; anything else becomes 100 %.
    pub fn from_percent(theta: u32) -> Self {
        match theta {
            25 => TxProbability::P25,
            50 => TxProbability::P50,
            75 => TxProbability::P75,
            _ => TxProbability::P100,
        }
    }
}

/// Transmit parameters of a UE-selected discovery pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiscTxParameters {
    /// Announcement transmission probability
    pub tx_probability: TxProbability,
}

/// Network-signalled discovery pool.
///
/// Presence of transmit parameters decides the pool type, as for
/// communication pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscPoolConfig {
    /// Cyclic prefix
    pub cp_len: CyclicPrefix,
    /// Discovery period length
    pub disc_period: DiscPeriod,
    /// Retransmissions per announcement (0..=3)
    pub num_retx: u8,
    /// Bitmap repetitions within the period
    pub num_repetition: u8,
    /// Time/frequency resources
    pub tf: TfResourceConfig,
    /// Transmit parameters, absent for scheduled pools
    pub tx_parameters: Option<DiscTxParameters>,
}

/// Preconfigured (out-of-coverage) discovery pool; always UE selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreconfigDiscPool {
    /// Cyclic prefix
    pub cp_len: CyclicPrefix,
    /// Discovery period length
    pub disc_period: DiscPeriod,
    /// Retransmissions per announcement (0..=3)
    pub num_retx: u8,
    /// Bitmap repetitions within the period
    pub num_repetition: u8,
    /// Time/frequency resources
    pub tf: TfResourceConfig,
    /// Transmit parameters
    pub tx_parameters: DiscTxParameters,
}
