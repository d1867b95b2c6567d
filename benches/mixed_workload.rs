//! Mixed insert/remove/lookup throughput per variant.
//!
//! - **single_batch**: one thread, one region, `batch_size` operations. Shows
//!   the cost of entering a region plus the per-operation cost.
//! - **mixed_rounds**: the full runner with a fixed round budget, over thread
//!   counts.
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench mixed_workload
//! cargo bench --bench mixed_workload -- mixed_rounds
//! ```

use divan::counter::ItemsCount;
use divan::{Bencher, black_box};
use mapbench::adapter::{
    EpochSkipList, LockedHashMap, PapayaHashMap, SddTreeIndex, ShardedDashMap,
};
use mapbench::config::DEFAULT_BATCH_SIZE;
use mapbench::{BenchmarkConfig, HashMapBenchmark, MapAdapter, RunConfig, ThreadConfig, runner};

fn main() {
    divan::main();
}

fn setup<M: MapAdapter>() -> HashMapBenchmark<M> {
    HashMapBenchmark::setup(BenchmarkConfig::default()).unwrap()
}

// =============================================================================
// 01: Single batch, single thread
// =============================================================================

#[divan::bench_group(name = "01_single_batch")]
mod single_batch {
    use super::*;

    #[divan::bench(types = [
        PapayaHashMap,
        PapayaHashMap<128>,
        EpochSkipList,
        SddTreeIndex,
        ShardedDashMap,
        LockedHashMap,
    ])]
    fn batch<M: MapAdapter>(bencher: Bencher) {
        let bench = setup::<M>();
        let mut worker = bench
            .create_thread(0, &ThreadConfig::mixed(1), 0x5eed)
            .unwrap();

        bencher
            .counter(ItemsCount::new(DEFAULT_BATCH_SIZE))
            .bench_local(|| worker.run_batch(black_box(bench.map())));
    }
}

// =============================================================================
// 02: Full runner, fixed rounds
// =============================================================================

#[divan::bench_group(name = "02_mixed_rounds", sample_count = 20)]
mod mixed_rounds {
    use super::*;

    const ROUNDS: u64 = 200;

    #[divan::bench(
        types = [
            PapayaHashMap,
            PapayaHashMap<32>,
            EpochSkipList,
            SddTreeIndex,
            ShardedDashMap,
            LockedHashMap,
        ],
        args = [1, 2, 4, 8],
    )]
    fn run<M: MapAdapter>(bencher: Bencher, threads: u32) {
        let run = RunConfig {
            rounds: Some(ROUNDS),
            threads: vec![ThreadConfig::mixed(threads)],
            ..RunConfig::default()
        };
        let attempts: u64 = u64::from(threads) * ROUNDS * u64::from(DEFAULT_BATCH_SIZE);

        bencher
            .counter(ItemsCount::new(attempts))
            .with_inputs(setup::<M>)
            .bench_local_values(|bench| {
                runner::run(&bench, &run).unwrap();
                bench
            });
    }
}
