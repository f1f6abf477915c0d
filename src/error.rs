use std::fmt;

/// 应用程序错误类型
///
/// 只覆盖访问接口（创建/查询/提交/删除）的错误分类。
/// 延迟流水线内部的失败（LLM 调用、PDF 渲染、邮件发送）由 worker
/// 统一捕获并记录日志，不会以该类型向上传播。
#[derive(Debug)]
pub enum AppError {
    /// 数据校验错误（写入时拒绝）
    Validation(ValidationError),
    /// 查询错误（按访问码/ID 未找到）
    Lookup(LookupError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "校验错误: {}", e),
            AppError::Lookup(e) => write!(f, "查询错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Validation(e) => Some(e),
            AppError::Lookup(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 数据校验错误
///
/// 题目写入时必须满足：选项列表非空，且 `0 <= correct_index < options.len()`。
#[derive(Debug)]
pub enum ValidationError {
    /// 选项列表为空
    EmptyOptions { question: String },
    /// 正确答案索引越界
    CorrectIndexOutOfRange {
        question: String,
        index: usize,
        option_count: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyOptions { question } => {
                write!(f, "题目 '{}' 的选项列表为空", question)
            }
            ValidationError::CorrectIndexOutOfRange {
                question,
                index,
                option_count,
            } => {
                write!(
                    f,
                    "题目 '{}' 的正确答案索引 {} 越界（共 {} 个选项）",
                    question, index, option_count
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// 查询错误
#[derive(Debug)]
pub enum LookupError {
    /// 按访问码未找到测验
    QuizNotFound { access_code: String },
    /// 按 ID 未找到提交记录
    SubmissionNotFound { submission_id: u64 },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::QuizNotFound { access_code } => {
                write!(f, "访问码 '{}' 对应的测验不存在", access_code)
            }
            LookupError::SubmissionNotFound { submission_id } => {
                write!(f, "提交记录 #{} 不存在", submission_id)
            }
        }
    }
}

impl std::error::Error for LookupError {}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建"测验不存在"错误
    pub fn quiz_not_found(access_code: impl Into<String>) -> Self {
        AppError::Lookup(LookupError::QuizNotFound {
            access_code: access_code.into(),
        })
    }

    /// 创建"提交记录不存在"错误
    pub fn submission_not_found(submission_id: u64) -> Self {
        AppError::Lookup(LookupError::SubmissionNotFound { submission_id })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
