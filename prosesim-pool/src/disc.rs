//! Discovery resource pools (PSDCH).

use prosesim_common::SubframeInfo;
use tracing::debug;

use crate::comm::SlTransmissionInfo;
use crate::config::{DiscPoolConfig, PreconfigDiscPool, TfResourceConfig, TxProbability};
use crate::period::{current_period_start, next_period_start, period_start_abs};

/// A configured discovery pool with its channel geometry.
///
/// Only UE-selected pools are supported; scheduled discovery resources come
/// as explicit index pairs and are out of scope here.
#[derive(Debug, Clone)]
pub struct DiscResourcePool {
    preconfigured: bool,
    disc_period: u32,
    num_retx: u8,
    tf: TfResourceConfig,
    /// Usable discovery subframes, as offsets into the discovery period
    lpsdch: Vec<u32>,
    /// Usable discovery PRBs
    rbpsdch: Vec<u8>,
    n_psdch: u32,
}

impl DiscResourcePool {
    /// Builds a pool from a network-signalled configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configuration carries no transmit parameters, which
    /// would make it a scheduled pool.
    pub fn from_config(config: &DiscPoolConfig) -> Self {
        assert!(
            config.tx_parameters.is_some(),
            "scheduled discovery pools are not supported"
        );
        Self::build(
            false,
            config.disc_period.subframes(),
            config.num_retx,
            config.num_repetition,
            config.tf.clone(),
        )
    }

    /// Builds a pool from a preconfigured (out-of-coverage) configuration.
    pub fn from_preconfig(config: &PreconfigDiscPool) -> Self {
        Self::build(
            true,
            config.disc_period.subframes(),
            config.num_retx,
            config.num_repetition,
            config.tf.clone(),
        )
    }

    fn build(
        preconfigured: bool,
        disc_period: u32,
        num_retx: u8,
        num_repetition: u8,
        tf: TfResourceConfig,
    ) -> Self {
        let bitmap_len = tf.subframe_bitmap.len() as u32;
        assert!(bitmap_len > 0, "empty discovery bitmap");
        assert!(num_retx <= 3, "at most 3 retransmissions per announcement");
        assert!(num_repetition > 0, "bitmap must repeat at least once");

        let mut lpsdch = Vec::new();
        for j in 0..(num_repetition as u32 * bitmap_len) {
            let bj = (j % bitmap_len) as usize;
            if tf.subframe_bitmap.is_set(bj) {
                lpsdch.push(j);
            }
        }
        let rbpsdch = tf.pool_rbs();

        let n_psdch =
            lpsdch.len() as u32 / (num_retx as u32 + 1) * (rbpsdch.len() as u32 / 2);

        debug!(
            l_psdch = lpsdch.len(),
            rb_psdch = rbpsdch.len(),
            n_psdch,
            "discovery pool geometry"
        );

        Self {
            preconfigured,
            disc_period,
            num_retx,
            tf,
            lpsdch,
            rbpsdch,
            n_psdch,
        }
    }

    /// True for preconfigured (out-of-coverage) pools
    pub fn is_preconfigured(&self) -> bool {
        self.preconfigured
    }

    /// Discovery period length in subframes
    pub fn disc_period_subframes(&self) -> u32 {
        self.disc_period
    }

    /// Retransmissions per announcement
    pub fn num_retx(&self) -> u8 {
        self.num_retx
    }

    /// Number of discovery resources in the pool
    pub fn n_psdch(&self) -> u32 {
        self.n_psdch
    }

    /// Number of usable discovery subframes
    pub fn n_subframes(&self) -> u32 {
        self.lpsdch.len() as u32
    }

    /// Number of PRB pairs in the pool
    pub fn n_rb_pairs(&self) -> u32 {
        self.rbpsdch.len() as u32 / 2
    }

    /// Start of the discovery period containing `current`.
    pub fn current_period_start(&self, current: &SubframeInfo) -> SubframeInfo {
        current_period_start(self.tf.offset, self.disc_period, current)
    }

    /// Start of the discovery period after the one containing `current`.
    pub fn next_period_start(&self, current: &SubframeInfo) -> SubframeInfo {
        next_period_start(self.tf.offset, self.disc_period, current)
    }

    /// The transmissions of discovery resource `npsdch`, one per
    /// (re)transmission, in pool coordinates (subframes within the period
    /// and actual PRBs). Each transmission occupies one PRB pair.
    ///
    /// # Panics
    ///
    /// Panics if `npsdch` is not below [`n_psdch`](Self::n_psdch).
    pub fn psdch_transmissions(&self, npsdch: u32) -> Vec<SlTransmissionInfo> {
        assert!(
            npsdch < self.n_psdch,
            "requesting discovery resource {npsdch} but pool has {}",
            self.n_psdch
        );

        let n = self.num_retx as u32 + 1;
        let nf = self.rbpsdch.len() as u32 / 2;
        let nt = self.lpsdch.len() as u32 / n;

        let mut txs = Vec::with_capacity(n as usize);
        for j in 1..=n {
            let inter = (j - 1) * (nf / n) + npsdch / nt;
            let aj = inter % nf;
            let b1 = npsdch % nt;
            let info = SlTransmissionInfo {
                subframe: SubframeInfo::from_absolute(n * b1 + j - 1),
                rb_start: (2 * aj) as u8,
                nb_rb: 2,
            };
            txs.push(self.translate_psdch(&info));
        }
        txs
    }

    /// Maps a logical discovery transmission to actual subframe and PRB.
    fn translate_psdch(&self, info: &SlTransmissionInfo) -> SlTransmissionInfo {
        let logical = info.subframe.absolute() as usize;
        assert!(logical < self.lpsdch.len());
        assert!((info.rb_start as usize) < self.rbpsdch.len());
        SlTransmissionInfo {
            subframe: SubframeInfo::from_absolute(self.lpsdch[logical]),
            rb_start: self.rbpsdch[info.rb_start as usize],
            nb_rb: info.nb_rb,
        }
    }

    /// PRBs usable for discovery reception in the given subframe; empty when
    /// the subframe carries no discovery channel.
    pub fn psdch_opportunities(&self, current: &SubframeInfo) -> Vec<u8> {
        let start = period_start_abs(self.tf.offset, self.disc_period, current);
        let idx = current.absolute() as i64 - start;
        if idx >= 0
            && (idx as usize) < self.tf.subframe_bitmap.len()
            && self.tf.subframe_bitmap.is_set(idx as usize)
        {
            self.rbpsdch.clone()
        } else {
            Vec::new()
        }
    }
}

/// Transmit-side discovery pool: the pool plus the announcement probability.
#[derive(Debug, Clone)]
pub struct TxDiscResourcePool {
    pool: DiscResourcePool,
    tx_probability: TxProbability,
}

impl TxDiscResourcePool {
    /// Wraps a network-signalled pool with its transmit parameters.
    ///
    /// # Panics
    ///
    /// Panics if the configuration carries no transmit parameters.
    pub fn from_config(config: &DiscPoolConfig) -> Self {
        let pool = DiscResourcePool::from_config(config);
        let tx_probability = match &config.tx_parameters {
            Some(params) => params.tx_probability,
            None => panic!("scheduled discovery pools are not supported"),
        };
        Self {
            pool,
            tx_probability,
        }
    }

    /// Wraps a preconfigured pool with its transmit parameters.
    pub fn from_preconfig(config: &PreconfigDiscPool) -> Self {
        Self {
            pool: DiscResourcePool::from_preconfig(config),
            tx_probability: config.tx_parameters.tx_probability,
        }
    }

    /// The underlying pool
    pub fn pool(&self) -> &DiscResourcePool {
        &self.pool
    }

    /// Announcement transmission probability as a percentage
    pub fn tx_probability(&self) -> u32 {
        self.tx_probability.as_percent()
    }

    /// Sets the announcement probability from a percentage; values outside
    /// the signalled set fall back to 100 %.
    pub fn set_tx_probability(&mut self, theta: u32) {
        self.tx_probability = TxProbability::from_percent(theta);
    }
}
