/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 测验定义 TOML 文件存放目录
    pub toml_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 提交后延迟多少秒执行学习指南流水线
    pub guide_delay_secs: u64,
    /// 学习指南 PDF 的临时输出目录（为空时使用系统临时目录）
    pub guide_output_dir: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 邮件配置 ---
    pub smtp_relay: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub mail_from: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toml_folder: "quiz_toml".to_string(),
            verbose_logging: false,
            guide_delay_secs: 5,
            guide_output_dir: String::new(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            smtp_relay: "smtp.gmail.com".to_string(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            mail_from: "study-guides@smartstudy.com".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            toml_folder: std::env::var("QUIZ_TOML_FOLDER").unwrap_or(default.toml_folder),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            guide_delay_secs: std::env::var("GUIDE_DELAY_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.guide_delay_secs),
            guide_output_dir: std::env::var("GUIDE_OUTPUT_DIR").unwrap_or(default.guide_output_dir),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            smtp_relay: std::env::var("SMTP_RELAY").unwrap_or(default.smtp_relay),
            smtp_username: std::env::var("SMTP_USERNAME").unwrap_or(default.smtp_username),
            smtp_password: std::env::var("SMTP_PASSWORD").unwrap_or(default.smtp_password),
            mail_from: std::env::var("MAIL_FROM").unwrap_or(default.mail_from),
        }
    }
}
