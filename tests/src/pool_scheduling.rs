//! Resource pool scheduling driven by the simulation clock
//!
//! Ties the clock from prosesim-common to the pool geometry in prosesim-pool
//! the way a UE MAC would: advance the clock tick by tick, find period
//! boundaries, pick a grant and check the resulting transmissions stay within
//! the pool.

use prosesim_common::{SimulationClock, SubframeInfo, HYPERFRAME_SUBFRAMES};
use prosesim_pool::{
    CommPoolConfig, CommResourcePool, CyclicPrefix, DiscPeriod, DiscPoolConfig,
    DiscResourcePool, HoppingConfig, HoppingInfo, SlPeriod, SubframeBitmap, TfResourceConfig,
    TxProbability, DiscTxParameters, UeSelectedConfig,
};

use crate::test_utils::init_test_logging;

fn ue_selected_pool() -> CommResourcePool {
    ue_selected_pool_with(HoppingConfig {
        info: HoppingInfo::Disabled,
        rb_offset: 0,
        num_subbands: 0,
    })
}

fn ue_selected_pool_with(data_hopping: HoppingConfig) -> CommResourcePool {
    let config = CommPoolConfig {
        sc_cp_len: CyclicPrefix::Normal,
        sc_period: SlPeriod::Sf40,
        sc_tf: TfResourceConfig {
            prb_start: 0,
            prb_num: 22,
            prb_end: 49,
            offset: 0,
            subframe_bitmap: SubframeBitmap::from_bits("1111111100000000000000000000000000000000"),
        },
        data_cp_len: CyclicPrefix::Normal,
        data_hopping,
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
    };
    CommResourcePool::from_config(&config)
}

#[test]
fn test_clock_driven_period_boundaries() {
    init_test_logging();
    let pool = ue_selected_pool();
    let mut clock = SimulationClock::new();

    // at tick 0 the first period is already ours
    assert_eq!(
        pool.current_period_start(&clock.current_subframe()),
        SubframeInfo::new(0, 0)
    );

    // one tick per subframe until the next boundary
    clock.advance(39);
    assert_eq!(
        pool.next_period_start(&clock.current_subframe()),
        SubframeInfo::new(4, 0)
    );
    clock.advance(1);
    assert_eq!(
        pool.current_period_start(&clock.current_subframe()),
        SubframeInfo::new(4, 0)
    );

    // the calendar wraps after 10240 subframes and so does the pool
    clock.advance((HYPERFRAME_SUBFRAMES - 60) as u64);
    assert_eq!(clock.current_subframe(), SubframeInfo::new(1022, 0));
    assert_eq!(
        pool.next_period_start(&clock.current_subframe()),
        SubframeInfo::new(0, 0)
    );
}

#[test]
fn test_grant_transmissions_stay_in_pool() {
    init_test_logging();
    let pool = ue_selected_pool();
    let mut clock = SimulationClock::new();
    clock.advance(100);

    let period_start = pool.next_period_start(&clock.current_subframe());

    // a pattern repeating in every subframe, four PRBs starting at PRB 2
    let txs = pool.pssch_transmissions(&period_start, 106, 2, 4);
    assert!(!txs.is_empty());
    assert_eq!(txs.len() % 4, 0);
    for tx in &txs {
        assert!(tx.subframe.absolute() >= period_start.absolute());
        assert!(pool.is_in_pool(tx.rb_start, tx.nb_rb));
    }
}

#[test]
fn test_valid_allocation_feeds_a_usable_grant() {
    init_test_logging();
    let pool = ue_selected_pool_with(HoppingConfig {
        info: HoppingInfo::Type1Variant0,
        rb_offset: 0,
        num_subbands: 0,
    });
    let clock = SimulationClock::new();

    let allocations = pool.valid_allocations();
    assert!(!allocations.is_empty());

    // take the widest grant and its first valid start, schedule it
    let rb_len = allocations.len() as u8;
    let rb_start = allocations[allocations.len() - 1][0];
    let period_start = pool.next_period_start(&clock.current_subframe());
    let txs = pool.pssch_transmissions(&period_start, 0, rb_start, rb_len);
    assert!(!txs.is_empty());
    for tx in &txs {
        // hopped or not, every transmission stays inside the data pool
        assert!(pool.is_in_pool(tx.rb_start, tx.nb_rb));
    }
}

#[test]
fn test_discovery_announcements_follow_the_clock() {
    init_test_logging();
    let config = DiscPoolConfig {
        cp_len: CyclicPrefix::Normal,
        disc_period: DiscPeriod::Rf32,
        num_retx: 0,
        num_repetition: 1,
        tf: TfResourceConfig {
            prb_start: 10,
            prb_num: 1,
            prb_end: 12,
            offset: 0,
            subframe_bitmap: SubframeBitmap::from_bits("11000000"),
        },
        tx_parameters: Some(DiscTxParameters {
            tx_probability: TxProbability::P100,
        }),
    };
    let pool = DiscResourcePool::from_config(&config);
    assert!(pool.n_psdch() > 0);

    let mut clock = SimulationClock::new();
    let mut announcement_subframes = Vec::new();
    for _ in 0..640 {
        if !pool
            .psdch_opportunities(&clock.current_subframe())
            .is_empty()
        {
            announcement_subframes.push(clock.current_subframe().absolute());
        }
        clock.tick();
    }
    // two announcing subframes per 320 ms discovery period
    assert_eq!(announcement_subframes, [0, 1, 320, 321]);
}
