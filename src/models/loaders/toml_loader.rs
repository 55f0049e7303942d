use crate::error::{AppError, AppResult, FileError};
use crate::models::scenario::{nse_vs_sdr, Scenario, ScenarioFile};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载场景
///
/// 文件不存在、无法读取、TOML 语法错误、记录不是扁平标量对象，分别对应不同的错误
pub async fn load_scenario(toml_file_path: &Path) -> AppResult<Scenario> {
    let path_str = toml_file_path.display().to_string();

    if !toml_file_path.exists() {
        return Err(FileError::NotFound { path: path_str }.into());
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(path_str.clone(), e))?;

    let file: ScenarioFile = toml::from_str(&content)?;

    let fallback_name = toml_file_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "scenario".to_string());

    let scenario = file.into_scenario(&fallback_name)?;

    tracing::info!(
        "成功加载场景 {} ({}): {} 个变体, {} 组共享字段",
        scenario.name,
        path_str,
        scenario.variants.len(),
        scenario.shared.len()
    );

    Ok(scenario)
}

/// 有配置文件时从文件加载，否则使用内置的 NSE / SDR 场景
pub async fn load_scenario_or_builtin(scenario_file: Option<&str>) -> AppResult<Scenario> {
    match scenario_file {
        Some(path) => {
            tracing::info!("正在加载场景文件: {}", path);
            load_scenario(Path::new(path)).await
        }
        None => {
            tracing::info!("未指定场景文件，使用内置 NSE / SDR 场景");
            Ok(nse_vs_sdr())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::Scalar;
    use std::path::PathBuf;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("orient_batch_{}_{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_scenario_from_toml() {
        let path = temp_file(
            "two_variants.toml",
            r#"
            name = "demo"

            [[variants]]
            "!A" = true
            x = 1

            [[variants]]
            "!A" = false
            x = 2

            [[shared]]
            y = 10
            hash = "sha"
            "#,
        );

        let scenario = load_scenario(&path).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(scenario.name, "demo");
        assert_eq!(scenario.variants.len(), 2);
        assert_eq!(scenario.shared.len(), 1);
        assert_eq!(scenario.variants[1].get("x"), Some(Scalar::Number(2.0)));
        assert_eq!(scenario.shared[0].get("hash"), Some(Scalar::Text("sha".into())));
    }

    #[tokio::test]
    async fn test_missing_name_falls_back_to_file_stem() {
        let path = temp_file("unnamed.toml", "[[variants]]\nx = 1\n");
        let scenario = load_scenario(&path).await.unwrap();
        std::fs::remove_file(&path).ok();
        assert!(scenario.name.ends_with("unnamed"));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let result = load_scenario(Path::new("/definitely/not/here.toml")).await;
        assert!(matches!(result, Err(AppError::File(FileError::NotFound { .. }))));
    }

    #[tokio::test]
    async fn test_bad_toml_syntax_is_toml_error() {
        let path = temp_file("broken.toml", "[[variants]\nx = ");
        let result = load_scenario(&path).await;
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(AppError::Toml(_))));
    }

    #[tokio::test]
    async fn test_nested_variant_is_query_error() {
        let path = temp_file("nested.toml", "[[variants]]\nx = 1\n[variants.inner]\ny = 2\n");
        let result = load_scenario(&path).await;
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(AppError::Query(_))));
    }

    #[tokio::test]
    async fn test_builtin_when_no_file() {
        let scenario = load_scenario_or_builtin(None).await.unwrap();
        assert_eq!(scenario.variants.len(), 2);
    }
}
