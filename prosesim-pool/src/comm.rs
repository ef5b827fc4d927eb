//! Communication resource pools (PSCCH and PSSCH).

use prosesim_common::{SubframeInfo, HYPERFRAME_SUBFRAMES};
use tracing::debug;

use crate::config::{CommPoolConfig, HoppingConfig, HoppingInfo, PreconfigCommPool, TfResourceConfig, TrptSubset};
use crate::period::{current_period_start, next_period_start, period_start_abs};
use crate::trp;

/// How data resources are selected on this pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolType {
    /// Data grants come from the network scheduler
    Scheduled,
    /// The UE selects its own data resources
    UeSelected,
}

/// One transmission: a subframe and a contiguous block of PRBs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlTransmissionInfo {
    /// Subframe of the transmission
    pub subframe: SubframeInfo,
    /// First PRB
    pub rb_start: u8,
    /// Number of contiguous PRBs
    pub nb_rb: u8,
}

/// A configured communication pool with its channel geometry.
///
/// Geometry (usable subframe and PRB lists, resource counts) is computed once
/// at construction; every query afterwards is pure.
#[derive(Debug, Clone)]
pub struct CommResourcePool {
    pool_type: PoolType,
    preconfigured: bool,
    sc_period: u32,
    sc_tf: TfResourceConfig,
    data_hopping: HoppingConfig,
    data_tf: Option<TfResourceConfig>,
    trpt_subset: TrptSubset,
    /// Usable control subframes, as offsets into the control period
    lpscch: Vec<u32>,
    /// Usable control PRBs
    rbpscch: Vec<u8>,
    /// Usable data subframes, as offsets into the control period
    lpssch: Vec<u32>,
    /// Usable data PRBs
    rbpssch: Vec<u8>,
    n_pscch: u32,
}

impl CommResourcePool {
    /// Builds a pool from a network-signalled configuration.
    pub fn from_config(config: &CommPoolConfig) -> Self {
        let (pool_type, data_tf, trpt_subset) = match &config.ue_selected {
            Some(ue) => (
                PoolType::UeSelected,
                Some(ue.data_tf.clone()),
                ue.trpt_subset.unwrap_or_default(),
            ),
            None => (PoolType::Scheduled, None, TrptSubset::default()),
        };
        Self::build(
            pool_type,
            false,
            config.sc_period.subframes(),
            config.sc_tf.clone(),
            config.data_hopping,
            data_tf,
            trpt_subset,
        )
    }

    /// Builds a pool from a preconfigured (out-of-coverage) configuration.
    ///
    /// Preconfigured pools are always UE selected and skip the repetition
    /// pattern restriction when granting.
    pub fn from_preconfig(config: &PreconfigCommPool) -> Self {
        Self::build(
            PoolType::UeSelected,
            true,
            config.sc_period.subframes(),
            config.sc_tf.clone(),
            config.data_hopping,
            Some(config.data_tf.clone()),
            config.trpt_subset,
        )
    }

    fn build(
        pool_type: PoolType,
        preconfigured: bool,
        sc_period: u32,
        sc_tf: TfResourceConfig,
        data_hopping: HoppingConfig,
        data_tf: Option<TfResourceConfig>,
        trpt_subset: TrptSubset,
    ) -> Self {
        assert!(
            sc_tf.subframe_bitmap.len() as u32 <= sc_period,
            "control bitmap longer than the control period"
        );

        let mut lpscch = Vec::new();
        for i in 0..sc_tf.subframe_bitmap.len() {
            if sc_tf.subframe_bitmap.is_set(i) {
                lpscch.push(i as u32);
            }
        }
        // the second control transmission rotates modulo L-1
        assert!(
            lpscch.len() >= 2,
            "control bitmap must select at least two subframes"
        );
        let rbpscch = sc_tf.pool_rbs();
        let n_pscch = lpscch.len() as u32 * rbpscch.len() as u32 / 2;

        let mut lpssch = Vec::new();
        let mut rbpssch = Vec::new();
        match pool_type {
            PoolType::Scheduled => {
                // subframes after the last control subframe belong to the
                // scheduled data pool; the network signals the PRBs per grant
                let last = *lpscch.last().unwrap_or(&0);
                for i in (last + 1)..sc_period {
                    lpssch.push(i);
                }
            }
            PoolType::UeSelected => {
                let tf = data_tf
                    .as_ref()
                    .unwrap_or_else(|| panic!("UE-selected pool without data resources"));
                let bitmap_len = tf.subframe_bitmap.len() as u32;
                assert!(bitmap_len > 0, "empty data bitmap");
                for i in tf.offset..sc_period {
                    let bj = ((i - tf.offset) % bitmap_len) as usize;
                    if tf.subframe_bitmap.is_set(bj) {
                        lpssch.push(i);
                    }
                }
                rbpssch = tf.pool_rbs();
            }
        }

        debug!(
            ?pool_type,
            l_pscch = lpscch.len(),
            rb_pscch = rbpscch.len(),
            n_pscch,
            l_pssch = lpssch.len(),
            rb_pssch = rbpssch.len(),
            "communication pool geometry"
        );

        Self {
            pool_type,
            preconfigured,
            sc_period,
            sc_tf,
            data_hopping,
            data_tf,
            trpt_subset,
            lpscch,
            rbpscch,
            lpssch,
            rbpssch,
            n_pscch,
        }
    }

    /// Pool type
    pub fn pool_type(&self) -> PoolType {
        self.pool_type
    }

    /// True for preconfigured (out-of-coverage) pools
    pub fn is_preconfigured(&self) -> bool {
        self.preconfigured
    }

    /// Control period length in subframes
    pub fn sc_period_subframes(&self) -> u32 {
        self.sc_period
    }

    /// Number of control-channel resources in the pool
    pub fn n_pscch(&self) -> u32 {
        self.n_pscch
    }

    /// Data-channel hopping configuration
    pub fn data_hopping(&self) -> &HoppingConfig {
        &self.data_hopping
    }

    fn data_tf(&self) -> &TfResourceConfig {
        match &self.data_tf {
            Some(tf) => tf,
            None => panic!("scheduled pool carries no data resource configuration"),
        }
    }

    /// Start of the control period containing `current`.
    pub fn current_period_start(&self, current: &SubframeInfo) -> SubframeInfo {
        current_period_start(self.sc_tf.offset, self.sc_period, current)
    }

    /// Start of the control period after the one containing `current`.
    pub fn next_period_start(&self, current: &SubframeInfo) -> SubframeInfo {
        next_period_start(self.sc_tf.offset, self.sc_period, current)
    }

    /// The two transmissions of control resource `n`, earliest first, in
    /// pool coordinates (actual subframes within the period and actual PRBs).
    ///
    /// # Panics
    ///
    /// Panics if `n` is not below [`n_pscch`](Self::n_pscch).
    pub fn pscch_transmissions(&self, n: u32) -> Vec<SlTransmissionInfo> {
        assert!(
            n < self.n_pscch,
            "requesting control resource {n} but pool has {}",
            self.n_pscch
        );

        let l = self.lpscch.len() as u32;
        let r = self.rbpscch.len() as u32;

        let first_subframe = n % l;
        let first = SlTransmissionInfo {
            subframe: SubframeInfo::from_absolute(first_subframe),
            rb_start: (n / l) as u8,
            nb_rb: 1,
        };
        let second_subframe = (n + 1 + (n / l) % (l - 1)) % l;
        let second = SlTransmissionInfo {
            subframe: SubframeInfo::from_absolute(second_subframe),
            rb_start: (n / l + r / 2) as u8,
            nb_rb: 1,
        };

        if first.subframe < second.subframe {
            vec![self.translate_pscch(&first), self.translate_pscch(&second)]
        } else {
            vec![self.translate_pscch(&second), self.translate_pscch(&first)]
        }
    }

    /// Maps a logical control transmission to actual subframe and PRB.
    fn translate_pscch(&self, info: &SlTransmissionInfo) -> SlTransmissionInfo {
        let logical = info.subframe.absolute() as usize;
        assert!(logical < self.lpscch.len());
        assert!((info.rb_start as usize) < self.rbpscch.len());
        SlTransmissionInfo {
            subframe: SubframeInfo::from_absolute(self.lpscch[logical]),
            rb_start: self.rbpscch[info.rb_start as usize],
            nb_rb: info.nb_rb,
        }
    }

    /// PRBs usable for control reception in the given subframe; empty when
    /// the subframe carries no control channel.
    pub fn pscch_opportunities(&self, current: &SubframeInfo) -> Vec<u8> {
        let start = period_start_abs(self.sc_tf.offset, self.sc_period, current);
        let idx = current.absolute() as i64 - start;
        if idx >= 0
            && (idx as usize) < self.sc_tf.subframe_bitmap.len()
            && self.sc_tf.subframe_bitmap.is_set(idx as usize)
        {
            self.rbpscch.clone()
        } else {
            Vec::new()
        }
    }

    /// PRBs occupied by control resource `n` in the given subframe; empty
    /// when neither of its two transmissions falls there.
    pub fn pscch_rbs(&self, current: &SubframeInfo, n: u32) -> Vec<u8> {
        let period_start = self.current_period_start(current).absolute();
        let mut rbs = Vec::new();
        for tx in self.pscch_transmissions(n) {
            let tx_abs = (period_start + tx.subframe.absolute()) % HYPERFRAME_SUBFRAMES;
            if tx_abs == current.absolute() {
                for rb in tx.rb_start..tx.rb_start + tx.nb_rb {
                    rbs.push(rb);
                }
            }
        }
        rbs
    }

    /// Data transmissions of a grant in the period starting at
    /// `period_start`: repetition pattern `itrp` applied to the usable data
    /// subframes, with frequency hopping applied to `rb_start`. Subframes in
    /// the result are absolute; the count is always a multiple of 4.
    ///
    /// # Panics
    ///
    /// On UE-selected pools, panics if the pattern length is not permitted by
    /// the pool restriction (unless preconfigured), or if the grant PRBs fall
    /// outside the pool while hopping is not type 2. Panics on type 2
    /// hopping, which is not supported.
    pub fn pssch_transmissions(
        &self,
        period_start: &SubframeInfo,
        itrp: u8,
        rb_start: u8,
        rb_len: u8,
    ) -> Vec<SlTransmissionInfo> {
        if self.pool_type == PoolType::UeSelected {
            let k = trp::ktrp(itrp);
            assert!(
                (k == 1 && self.trpt_subset.k1)
                    || (k == 2 && self.trpt_subset.k2)
                    || (k == 4 && self.trpt_subset.k4)
                    || k == 8
                    || self.preconfigured,
                "repetition pattern {itrp} (k={k}) not permitted by the pool"
            );

            // type 2 hopping ignores the grant PRBs, skip the range check
            if self.data_hopping.info != HoppingInfo::Type2 {
                let tf = self.data_tf();
                for i in rb_start as u32..rb_start as u32 + rb_len as u32 {
                    assert!(
                        tf.rb_in_pool(i),
                        "rb {i} outside pool: prb_start={}, prb_end={}, prb_num={}",
                        tf.prb_start,
                        tf.prb_end,
                        tf.prb_num
                    );
                }
            }
        }

        let period_subframe = period_start.absolute();

        let mut subframes = Vec::new();
        for (i, &lp) in self.lpssch.iter().enumerate() {
            if trp::template_bit(itrp, i) && period_subframe + lp < HYPERFRAME_SUBFRAMES {
                subframes.push(period_subframe + lp);
            }
        }
        // the transport block always uses 4 transmissions
        subframes.truncate(subframes.len() - subframes.len() % 4);

        let mut n_sl0 = rb_start;
        let mut n_sl1 = rb_start;
        if self.data_hopping.info.is_enabled() {
            let rb_offset = even_rb_offset(self.data_hopping.rb_offset);
            match self.data_hopping.info {
                HoppingInfo::Type2 => {
                    panic!("type 2 frequency hopping is not supported");
                }
                _ => {
                    let n_prb = self.nprb_type1(rb_start);
                    n_sl0 = rb_start + rb_offset / 2;
                    n_sl1 = n_prb + rb_offset / 2;
                }
            }
        }

        let mut txs = Vec::with_capacity(subframes.len());
        for (i, &sf) in subframes.iter().enumerate() {
            // odd transmissions use slot 0, even transmissions slot 1
            let rb = if self.data_hopping.info.is_enabled() {
                if (i + 1) % 2 == 0 {
                    n_sl1
                } else {
                    n_sl0
                }
            } else {
                rb_start
            };
            txs.push(SlTransmissionInfo {
                subframe: SubframeInfo::from_absolute(sf),
                rb_start: rb,
                nb_rb: rb_len,
            });
        }
        txs
    }

    /// True if `rb_len` PRBs starting at `rb_start` all lie in the data pool.
    pub fn is_in_pool(&self, rb_start: u8, rb_len: u8) -> bool {
        let tf = self.data_tf();
        (rb_start as u32..rb_start as u32 + rb_len as u32).all(|i| tf.rb_in_pool(i))
    }

    /// Hopped PRB index of `rb_start` for the even slot under type 1 hopping.
    ///
    /// # Panics
    ///
    /// Panics unless a type 1 hopping variant is configured.
    fn nprb_type1(&self, rb_start: u8) -> u8 {
        assert!(
            self.data_hopping.info.is_type1(),
            "only type 1 frequency hopping computes per-slot PRBs"
        );
        let r = self.rbpssch.len() as u32;
        let rb_offset = even_rb_offset(self.data_hopping.rb_offset) as u32;
        let n_rb = r - rb_offset - r % 2;
        let rb_start = rb_start as u32;
        // variant 1 goes negative before the modulo and the broadcast tables
        // are built on the unsigned wraparound of that intermediate
        let n_prb = match self.data_hopping.info {
            HoppingInfo::Type1Variant0 => (n_rb / 4 + rb_start) % n_rb,
            HoppingInfo::Type1Variant1 => rb_start.wrapping_sub(n_rb / 4) % n_rb,
            HoppingInfo::Type1Variant2 => (n_rb / 2 + rb_start) % n_rb,
            _ => unreachable!(),
        };
        n_prb as u8
    }

    /// Largest grant length, in PRBs, the hopping allocation field can carry.
    fn max_lcrbs(&self) -> u8 {
        let r = self.rbpssch.len() as u32;
        let n_sl_hop = if (6..=49).contains(&r) {
            1
        } else if (50..=110).contains(&r) {
            2
        } else {
            0
        };
        let y = ceil_log2(r * (r + 1) / 2) - n_sl_hop;
        match self.data_hopping.info {
            HoppingInfo::Type2 => {
                let rb_offset = even_rb_offset(self.data_hopping.rb_offset) as u32;
                let n_rbpssch = match self.data_hopping.num_subbands {
                    0 => panic!("invalid number of subbands for type 2 frequency hopping"),
                    1 => r,
                    _ => r - rb_offset,
                };
                ((1u32 << y) / r).min(n_rbpssch / self.data_hopping.num_subbands as u32) as u8
            }
            _ => ((1u32 << y) / r) as u8,
        }
    }

    /// Valid `rb_start` indexes for a grant of `rb_len` PRBs.
    ///
    /// With type 1 hopping an index is valid when the grant fits the pool on
    /// both hopping slots. With hopping disabled the grant only needs to fit
    /// the pool as given.
    ///
    /// # Panics
    ///
    /// With hopping enabled, panics if `rb_len` exceeds what the allocation
    /// field can carry.
    pub fn valid_rb_starts(&self, rb_len: u8) -> Vec<u8> {
        let tf = self.data_tf();
        let mut starts = Vec::new();
        if self.data_hopping.info.is_enabled() {
            let max_lcrbs = self.max_lcrbs();
            assert!(
                rb_len <= max_lcrbs,
                "invalid rb_len {rb_len}, must be <= {max_lcrbs}"
            );
            match self.data_hopping.info {
                HoppingInfo::Type2 => {
                    // type 2 hopping does not use the start index
                    starts.push(0);
                }
                _ => {
                    let rb_offset = even_rb_offset(self.data_hopping.rb_offset);
                    for i in tf.prb_start..=tf.prb_end {
                        if self.is_in_pool(i, 1) {
                            let n_sl0 = i + rb_offset / 2;
                            let n_sl1 = self.nprb_type1(i) + rb_offset / 2;
                            if self.is_in_pool(n_sl0, rb_len) && self.is_in_pool(n_sl1, rb_len) {
                                starts.push(i);
                            }
                        }
                    }
                }
            }
        } else {
            for i in tf.prb_start..=tf.prb_end {
                if self.is_in_pool(i, rb_len) {
                    starts.push(i);
                }
            }
        }
        starts
    }

    /// Valid `rb_start` indexes for every grant length the allocation field
    /// can carry, indexed by `rb_len - 1`.
    ///
    /// # Panics
    ///
    /// Panics unless type 1 hopping is configured; type 2 enumeration is not
    /// supported and with hopping disabled there is no field-width bound to
    /// enumerate against.
    pub fn valid_allocations(&self) -> Vec<Vec<u8>> {
        match self.data_hopping.info {
            HoppingInfo::Type2 => {
                panic!("valid allocation enumeration for type 2 frequency hopping is not supported")
            }
            HoppingInfo::Disabled => {
                panic!("valid allocation enumeration requires frequency hopping")
            }
            _ => {
                let max_lcrbs = self.max_lcrbs();
                (1..=max_lcrbs).map(|mrb| self.valid_rb_starts(mrb)).collect()
            }
        }
    }
}

/// Transmit-side communication pool: the pool plus the active grant state.
#[derive(Debug, Clone)]
pub struct TxCommResourcePool {
    pool: CommResourcePool,
    index: u32,
    mcs: u8,
}

impl TxCommResourcePool {
    /// Wraps a pool with cleared grant state.
    pub fn new(pool: CommResourcePool) -> Self {
        Self {
            pool,
            index: 0,
            mcs: 0,
        }
    }

    /// The underlying pool
    pub fn pool(&self) -> &CommResourcePool {
        &self.pool
    }

    /// Scheduled grant resource index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Sets the scheduled grant resource index.
    pub fn set_index(&mut self, index: u32) {
        self.index = index;
    }

    /// Modulation and coding scheme of the grant; 0 lets the scheduler pick.
    pub fn mcs(&self) -> u8 {
        self.mcs
    }

    /// Sets the grant MCS.
    pub fn set_mcs(&mut self, mcs: u8) {
        self.mcs = mcs;
    }
}

/// Hopping RB offset rounded up to even.
fn even_rb_offset(rb_offset: u8) -> u8 {
    if rb_offset % 2 != 0 {
        rb_offset + 1
    } else {
        rb_offset
    }
}

/// Smallest p with `2^p >= value`.
fn ceil_log2(value: u32) -> u32 {
    if value <= 1 {
        0
    } else {
        32 - (value - 1).leading_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CyclicPrefix, SlPeriod, SubframeBitmap, TrptSubset, UeSelectedConfig,
    };

    fn sc_tf(bitmap: &str) -> TfResourceConfig {
        TfResourceConfig {
            prb_start: 0,
            prb_num: 22,
            prb_end: 49,
            offset: 0,
            subframe_bitmap: SubframeBitmap::from_bits(bitmap),
        }
    }

    fn ue_selected_config(hopping: HoppingConfig) -> CommPoolConfig {
        CommPoolConfig {
            sc_cp_len: CyclicPrefix::Normal,
            sc_period: SlPeriod::Sf40,
            sc_tf: sc_tf("1111111100000000000000000000000000000000"),
            data_cp_len: CyclicPrefix::Normal,
            data_hopping: hopping,
            ue_selected: Some(UeSelectedConfig {
                data_tf: TfResourceConfig {
                    prb_start: 0,
                    prb_num: 22,
                    prb_end: 49,
                    offset: 0,
                    subframe_bitmap: SubframeBitmap::from_bits(&"1".repeat(40)),
                },
                trpt_subset: None,
            }),
        }
    }

    fn no_hopping() -> HoppingConfig {
        HoppingConfig {
            info: HoppingInfo::Disabled,
            rb_offset: 0,
            num_subbands: 0,
        }
    }

    fn type1_hopping() -> HoppingConfig {
        HoppingConfig {
            info: HoppingInfo::Type1Variant0,
            rb_offset: 0,
            num_subbands: 0,
        }
    }

    fn tiny_pool() -> CommResourcePool {
        // 2 control subframes, 2 control PRBs
        let mut config = ue_selected_config(no_hopping());
        config.sc_tf = TfResourceConfig {
            prb_start: 0,
            prb_num: 1,
            prb_end: 1,
            offset: 0,
            subframe_bitmap: SubframeBitmap::from_bits("10100000"),
        };
        CommResourcePool::from_config(&config)
    }

    #[test]
    fn test_pscch_resource_count() {
        let pool = CommResourcePool::from_config(&ue_selected_config(no_hopping()));
        // 8 control subframes, 44 control PRBs
        assert_eq!(pool.n_pscch(), 176);
        assert_eq!(pool.pool_type(), PoolType::UeSelected);
        assert!(!pool.is_preconfigured());
    }

    #[test]
    #[should_panic(expected = "at least two subframes")]
    fn test_single_control_subframe_rejected() {
        let mut config = ue_selected_config(no_hopping());
        config.sc_tf.subframe_bitmap =
            SubframeBitmap::from_bits("1000000000000000000000000000000000000000");
        CommResourcePool::from_config(&config);
    }

    #[test]
    fn test_period_math_through_pool() {
        let pool = CommResourcePool::from_config(&ue_selected_config(no_hopping()));
        let now = SubframeInfo::new(1022, 0);
        assert_eq!(pool.current_period_start(&now), SubframeInfo::new(1020, 0));
        assert_eq!(pool.next_period_start(&now), SubframeInfo::new(0, 0));
    }

    #[test]
    fn test_pscch_transmissions_order_and_translation() {
        let pool = tiny_pool();
        assert_eq!(pool.n_pscch(), 2);
        let txs = pool.pscch_transmissions(1);
        assert_eq!(txs.len(), 2);
        // n=1: first lands on logical subframe 1, second on logical 0; the
        // second transmission therefore comes out first
        assert_eq!(txs[0].subframe, SubframeInfo::new(0, 0));
        assert_eq!(txs[0].rb_start, 1);
        assert_eq!(txs[1].subframe, SubframeInfo::new(0, 2));
        assert_eq!(txs[1].rb_start, 0);
        assert_eq!(txs[0].nb_rb, 1);
    }

    #[test]
    #[should_panic]
    fn test_pscch_transmissions_bounds() {
        tiny_pool().pscch_transmissions(2);
    }

    #[test]
    fn test_pscch_opportunities() {
        let pool = tiny_pool();
        assert_eq!(pool.pscch_opportunities(&SubframeInfo::new(0, 0)), vec![0, 1]);
        assert!(pool.pscch_opportunities(&SubframeInfo::new(0, 1)).is_empty());
        assert_eq!(pool.pscch_opportunities(&SubframeInfo::new(0, 2)), vec![0, 1]);
        // next period
        assert_eq!(pool.pscch_opportunities(&SubframeInfo::new(4, 0)), vec![0, 1]);
    }

    #[test]
    fn test_pscch_rbs() {
        let pool = tiny_pool();
        assert_eq!(pool.pscch_rbs(&SubframeInfo::new(0, 0), 1), vec![1]);
        assert_eq!(pool.pscch_rbs(&SubframeInfo::new(0, 2), 1), vec![0]);
        assert!(pool.pscch_rbs(&SubframeInfo::new(0, 1), 1).is_empty());
    }

    #[test]
    fn test_pssch_transmissions_truncate_to_multiple_of_four() {
        let pool = CommResourcePool::from_config(&ue_selected_config(no_hopping()));
        // pattern 0 repeats every 8 subframes: 5 hits over 40 usable
        // subframes, truncated to 4
        let txs = pool.pssch_transmissions(&SubframeInfo::new(0, 0), 0, 0, 2);
        assert_eq!(txs.len(), 4);
        let subframes: Vec<u32> = txs.iter().map(|t| t.subframe.absolute()).collect();
        assert_eq!(subframes, vec![0, 8, 16, 24]);
        assert!(txs.iter().all(|t| t.rb_start == 0 && t.nb_rb == 2));
    }

    #[test]
    fn test_pssch_transmissions_full_pattern() {
        let pool = CommResourcePool::from_config(&ue_selected_config(no_hopping()));
        let txs = pool.pssch_transmissions(&SubframeInfo::new(0, 0), 106, 0, 2);
        assert_eq!(txs.len(), 40);
    }

    #[test]
    fn test_pssch_transmissions_absolute_subframes() {
        let pool = CommResourcePool::from_config(&ue_selected_config(no_hopping()));
        let txs = pool.pssch_transmissions(&SubframeInfo::new(1020, 0), 0, 0, 2);
        assert_eq!(txs[0].subframe, SubframeInfo::new(1020, 0));
        assert_eq!(txs[1].subframe, SubframeInfo::new(1020, 8));
    }

    #[test]
    #[should_panic]
    fn test_pssch_rejects_forbidden_pattern_length() {
        let mut config = ue_selected_config(no_hopping());
        if let Some(ue) = config.ue_selected.as_mut() {
            ue.trpt_subset = Some(TrptSubset {
                k1: false,
                k2: true,
                k4: true,
            });
        }
        let pool = CommResourcePool::from_config(&config);
        pool.pssch_transmissions(&SubframeInfo::new(0, 0), 0, 0, 2);
    }

    #[test]
    fn test_preconfigured_ignores_pattern_restriction() {
        let config = ue_selected_config(no_hopping());
        let ue = config.ue_selected.clone().unwrap();
        let preconfig = PreconfigCommPool {
            sc_cp_len: CyclicPrefix::Normal,
            sc_period: SlPeriod::Sf40,
            sc_tf: config.sc_tf.clone(),
            data_cp_len: CyclicPrefix::Normal,
            data_hopping: no_hopping(),
            data_tf: ue.data_tf,
            trpt_subset: TrptSubset {
                k1: false,
                k2: false,
                k4: false,
            },
        };
        let pool = CommResourcePool::from_preconfig(&preconfig);
        assert!(pool.is_preconfigured());
        let txs = pool.pssch_transmissions(&SubframeInfo::new(0, 0), 0, 0, 2);
        assert_eq!(txs.len(), 4);
    }

    #[test]
    #[should_panic]
    fn test_pssch_rejects_grant_outside_pool() {
        let pool = CommResourcePool::from_config(&ue_selected_config(no_hopping()));
        // PRB 25 falls in the gap between the two bands
        pool.pssch_transmissions(&SubframeInfo::new(0, 0), 0, 25, 1);
    }

    #[test]
    fn test_type1_hopping_alternates_slots() {
        let pool = CommResourcePool::from_config(&ue_selected_config(type1_hopping()));
        // 44 data PRBs, offset 0: even slot PRB is (44/4 + 0) % 44 = 11
        let txs = pool.pssch_transmissions(&SubframeInfo::new(0, 0), 8, 0, 2);
        assert_eq!(txs.len(), 8);
        for (i, tx) in txs.iter().enumerate() {
            if (i + 1) % 2 == 0 {
                assert_eq!(tx.rb_start, 11);
            } else {
                assert_eq!(tx.rb_start, 0);
            }
        }
    }

    #[test]
    fn test_type1_variant1_wraps_through_unsigned_range() {
        let pool = CommResourcePool::from_config(&ue_selected_config(HoppingConfig {
            info: HoppingInfo::Type1Variant1,
            rb_offset: 0,
            num_subbands: 0,
        }));
        // 44 data PRBs: -(44/4) + 0 wraps through the unsigned range before
        // the modulo, landing on (2^32 - 11) % 44 = 37 rather than 33
        let txs = pool.pssch_transmissions(&SubframeInfo::new(0, 0), 8, 0, 2);
        assert_eq!(txs.len(), 8);
        for (i, tx) in txs.iter().enumerate() {
            if (i + 1) % 2 == 0 {
                assert_eq!(tx.rb_start, 37);
            } else {
                assert_eq!(tx.rb_start, 0);
            }
        }
    }

    #[test]
    fn test_is_in_pool() {
        let pool = CommResourcePool::from_config(&ue_selected_config(no_hopping()));
        assert!(pool.is_in_pool(0, 22));
        assert!(!pool.is_in_pool(21, 2));
        assert!(pool.is_in_pool(28, 22));
        assert!(!pool.is_in_pool(50, 1));
    }

    #[test]
    fn test_valid_rb_starts_without_hopping() {
        let pool = CommResourcePool::from_config(&ue_selected_config(no_hopping()));
        assert_eq!(pool.valid_rb_starts(22), vec![0, 28]);
    }

    #[test]
    fn test_valid_rb_starts_type1() {
        let pool = CommResourcePool::from_config(&ue_selected_config(type1_hopping()));
        let starts = pool.valid_rb_starts(1);
        // every start must fit the pool on both hopping slots
        for &s in &starts {
            assert!(pool.is_in_pool(s, 1));
            let n_sl1 = ((11 + s as u32) % 44) as u8;
            assert!(pool.is_in_pool(n_sl1, 1));
        }
        assert!(starts.contains(&0));
        assert!(starts.contains(&17));
        assert!(!starts.contains(&11));
        assert!(starts.contains(&49));
        assert_eq!(starts.len(), 38);
    }

    #[test]
    #[should_panic]
    fn test_valid_rb_starts_length_bound() {
        // 44 PRBs: allocation field carries at most 2^9/44 = 11 PRBs
        let pool = CommResourcePool::from_config(&ue_selected_config(type1_hopping()));
        pool.valid_rb_starts(12);
    }

    #[test]
    fn test_valid_allocations_type1() {
        let pool = CommResourcePool::from_config(&ue_selected_config(type1_hopping()));
        let allocations = pool.valid_allocations();
        assert_eq!(allocations.len(), 11);
        for (i, starts) in allocations.iter().enumerate() {
            let rb_len = (i + 1) as u8;
            assert!(starts.iter().all(|&s| pool.is_in_pool(s, rb_len)));
        }
    }

    #[test]
    #[should_panic]
    fn test_valid_allocations_requires_hopping() {
        let pool = CommResourcePool::from_config(&ue_selected_config(no_hopping()));
        pool.valid_allocations();
    }

    #[test]
    fn test_scheduled_pool_data_subframes() {
        let mut config = ue_selected_config(no_hopping());
        config.sc_tf.subframe_bitmap = SubframeBitmap::from_bits("10100000");
        config.ue_selected = None;
        let pool = CommResourcePool::from_config(&config);
        assert_eq!(pool.pool_type(), PoolType::Scheduled);
        // data subframes start after the last control subframe (2)
        let txs = pool.pssch_transmissions(&SubframeInfo::new(0, 0), 0, 0, 2);
        let subframes: Vec<u32> = txs.iter().map(|t| t.subframe.absolute()).collect();
        assert_eq!(subframes, vec![3, 11, 19, 27]);
    }

    #[test]
    fn test_tx_pool_grant_state() {
        let pool = CommResourcePool::from_config(&ue_selected_config(no_hopping()));
        let mut tx = TxCommResourcePool::new(pool);
        assert_eq!(tx.index(), 0);
        assert_eq!(tx.mcs(), 0);
        tx.set_index(5);
        tx.set_mcs(10);
        assert_eq!(tx.index(), 5);
        assert_eq!(tx.mcs(), 10);
        assert_eq!(tx.pool().n_pscch(), 176);
    }

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(3), 2);
        assert_eq!(ceil_log2(512), 9);
        assert_eq!(ceil_log2(990), 10);
    }
}
