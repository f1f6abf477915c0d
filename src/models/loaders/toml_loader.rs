use crate::models::quiz::NewQuiz;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载数据并转换为 NewQuiz 对象
pub async fn load_toml_to_quiz(toml_file_path: &Path) -> Result<NewQuiz> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let quiz: NewQuiz = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    Ok(quiz)
}

/// 从文件夹中加载所有 TOML 文件并转换为 NewQuiz 对象列表
pub async fn load_all_toml_files(folder_path: &str) -> Result<Vec<NewQuiz>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut quizzes = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            tracing::info!(
                "正在加载: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_toml_to_quiz(&path).await {
                Ok(quiz) => {
                    tracing::info!("成功加载 {} 个题目", quiz.questions.len());
                    quizzes.push(quiz);
                }
                Err(e) => {
                    tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
title = "World Capitals"
class_name = "Geography 101"

[[questions]]
text = "What is the capital of France?"
options = ["Paris", "London", "Berlin", "Madrid"]
correct_index = 0

[[questions]]
text = "What is the capital of Japan?"
options = ["Seoul", "Tokyo", "Beijing", "Bangkok"]
correct_index = 1
"#;

    #[tokio::test]
    async fn test_load_toml_to_quiz() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capitals.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let quiz = load_toml_to_quiz(&path).await.unwrap();
        assert_eq!(quiz.title, "World Capitals");
        assert_eq!(quiz.class_name.as_deref(), Some("Geography 101"));
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[1].correct_index, 1);
    }

    #[tokio::test]
    async fn test_load_all_toml_files_skips_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), SAMPLE).unwrap();
        std::fs::write(dir.path().join("bad.toml"), "not = [ valid").unwrap();

        let quizzes = load_all_toml_files(dir.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(quizzes.len(), 1);
    }
}
