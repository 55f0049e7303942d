//! 场景定义
//!
//! 一个场景 = 若干变体 + 若干组共享字段（按顺序依次 add）

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::QueryError;
use crate::models::record::Record;
use crate::query::{make_query, QueryBuilder};

/// 待编译的场景
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub variants: Vec<Record>,
    pub shared: Vec<Record>,
}

/// TOML 场景文件的原始结构
///
/// ```toml
/// name = "nse"
///
/// [[variants]]
/// "!NSE" = true
/// windows = 256
///
/// [[shared]]
/// rig_cost_gpu = 3000
/// ```
#[derive(Debug, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub variants: Vec<JsonValue>,
    #[serde(default)]
    pub shared: Vec<JsonValue>,
}

impl ScenarioFile {
    /// 校验所有记录都是扁平标量对象
    pub fn into_scenario(self, fallback_name: &str) -> Result<Scenario, QueryError> {
        let variants = self
            .variants
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Record::from_json(v).map_err(|e| QueryError::invalid(format!("variants[{}]: {}", i, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let shared = self
            .shared
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Record::from_json(v).map_err(|e| QueryError::invalid(format!("shared[{}]: {}", i, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Scenario {
            name: self.name.unwrap_or_else(|| fallback_name.to_string()),
            variants,
            shared,
        })
    }
}

impl Scenario {
    /// 构建查询：变体 + 依次 add 每组共享字段
    pub fn to_query(&self) -> Result<QueryBuilder, QueryError> {
        let builder = make_query(self.variants.clone())?;
        Ok(self
            .shared
            .iter()
            .cloned()
            .fold(builder, |builder, shared| builder.add(shared)))
    }
}

/// 内置场景：NSE 与 SDR 两种构造方案在相同硬件/网络假设下的对比
pub fn nse_vs_sdr() -> Scenario {
    let nse = Record::new()
        .with("!NSE", true)
        .with("!SDR", false)
        .with("windows", 256)
        .with("window_size_gib", 4)
        .with("nodes_in_sequence", 8)
        .with("post_window_challenges", 2)
        .with("porep_lambda", 10)
        .with("spacegap", 0.15)
        .with("delta", 0.05)
        .with("expander_degree", 384)
        .with("butterfly_degree", 16)
        .with("expander_layers", 8)
        .with("butterfly_layers", 7)
        .with("rig_cost", 4750);

    let sdr = Record::new()
        .with("!SDR", true)
        .with("!NSE", false)
        .with("replica_size_gib", 32)
        .with("porep_partitions", 8)
        .with("wpost_sectors", 2350)
        // 4GiB 需要 150s，4 块 GPU 并行
        .with("porep_time_commitment", (150.0 * 8.0) / 4.0)
        .with("cost_attack_replica", 0.015 / 10.0)
        .with("layers", 11)
        .with("parents", 37)
        .with("rig_cost", 2000);

    let shared = Record::new()
        .with("rig_cost_gpu", 3000)
        .with("rig_memaccess_throughput_tb_s", 3)
        .with("rig_hashing_throughput_tb_s", 0.016 * 32.0)
        .with("rig_lifetime_years", 2)
        .with("rig_storage_lifetime_years", 2)
        .with("rig_cost_storage_tb", 15)
        .with("rig_hashing_sequential_throughput_gb_s", 2.5)
        .with("mtree_hash_name", "poseidon")
        // 4 块 GPU
        .with("mtree_hash_time", 8.3e-7 / 4.0)
        .with("mtree_hash_blocks", 8)
        .with("mtree_hash_constraints", 508 + 56)
        .with("kdf_constraints", 25849.0 / 2.0)
        .with("commd_hash_name", "sha")
        .with("commd_hash_constraints", 25840)
        .with("commd_hash_time", 130e-9)
        .with("node_size", 32)
        .with("snark_partition", 100_000_000)
        .with("snark_constraint_time", 0.00000317488 / 4.0)
        .with("snark_size", 192)
        .with("proving_period_hours", 24)
        .with("network_size_eib", 10)
        .with("block_time", 30)
        .with("tipset_size", 1);

    Scenario {
        name: "nse".to_string(),
        variants: vec![nse, sdr],
        shared: vec![shared],
    }
}
