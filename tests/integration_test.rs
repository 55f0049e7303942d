use async_trait::async_trait;
use orient_batch::models::nse_vs_sdr;
use orient_batch::{
    make_query, App, BatchDispatcher, Combo, Config, DispatchOptions, Record, Solution,
    SolveError, Solver, TransportError,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// 回显求解器：SDR 组合模拟求解失败
struct EchoSolver;

#[async_trait]
impl Solver for EchoSolver {
    async fn check_ready(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn solve(&self, combo: &Combo) -> Result<Solution, SolveError> {
        if combo.get("!SDR").and_then(|v| v.as_bool()) == Some(true) {
            return Err(SolveError::Infeasible("sdr".to_string()));
        }
        let rig_cost = combo.get("rig_cost").and_then(|v| v.as_f64()).unwrap_or_default();
        Ok(Solution::new(json!({ "rig_cost": rig_cost })))
    }
}

fn temp_output(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("orient_batch_it_{}_{}", std::process::id(), name))
}

#[tokio::test]
async fn test_compile_then_dispatch_keeps_positions() {
    let combos = make_query(vec![
        Record::new().with("!SDR", false).with("rig_cost", 4750),
        Record::new().with("!SDR", true).with("rig_cost", 2000),
        Record::new().with("rig_cost", 100),
    ])
    .unwrap()
    .add(Record::new().with("rig_cost_gpu", 3000))
    .compile()
    .unwrap();

    let dispatcher = BatchDispatcher::new(
        Arc::new(EchoSolver),
        DispatchOptions {
            chunk_size: 1,
            request_timeout: Duration::from_secs(5),
        },
    );
    let results = dispatcher.solve_all(&combos).await.unwrap();

    assert_eq!(results.len(), combos.len());
    assert_eq!(results[0].as_ref().unwrap().field("rig_cost"), Some(&json!(4750.0)));
    assert!(results[1].is_none());
    assert_eq!(results[2].as_ref().unwrap().field("rig_cost"), Some(&json!(100.0)));
}

#[tokio::test]
async fn test_pipeline_with_builtin_scenario_exports_files() {
    let output_dir = temp_output("pipeline");
    let config = Config {
        output_dir: output_dir.to_string_lossy().to_string(),
        chunk_size: 2,
        ..Default::default()
    };

    let summary = App::with_solver(config.clone(), Arc::new(EchoSolver))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.combos, nse_vs_sdr().to_query().unwrap().compile().unwrap());
    assert_eq!(summary.results.len(), 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.model.is_none());

    let read = |name: &str| -> Value {
        serde_json::from_str(&std::fs::read_to_string(output_dir.join(name)).unwrap()).unwrap()
    };
    let combos = read(&config.combos_file);
    let results = read(&config.results_file);
    let debug = read(&config.debug_file);
    std::fs::remove_dir_all(&output_dir).ok();

    assert_eq!(combos.as_array().unwrap().len(), 2);
    assert_eq!(combos[0]["!NSE"], json!(true));
    assert_eq!(results, json!([{ "rig_cost": 4750.0 }]));
    assert_eq!(debug["results"][1], Value::Null);
    assert_eq!(debug["model"], Value::Null);
}

#[tokio::test]
#[ignore] // 需要本地运行 Orient 服务：cargo test -- --ignored
async fn test_pipeline_against_local_server() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = Config {
        output_dir: temp_output("live").to_string_lossy().to_string(),
        output_log_file: temp_output("live.log").to_string_lossy().to_string(),
        ..Config::from_env()
    };

    let summary = App::initialize(config)
        .await
        .expect("初始化失败")
        .run()
        .await
        .expect("运行失败");

    println!("成功 {} / 共 {}", summary.succeeded, summary.results.len());
    assert_eq!(summary.results.len(), summary.combos.len());
}
