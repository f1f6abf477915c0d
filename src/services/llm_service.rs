//! LLM 服务 - 业务能力层
//!
//! 只负责"生成学习指南文本"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Gemini 的兼容端点、Azure、Doubao 等）
//!
//! 客户端是显式对象，由进程引导阶段创建后注入流水线入口，
//! 不使用模块级单例。`GuideModel` trait 是流水线与具体客户端
//! 之间的接缝，测试中可以换成固定响应的假实现。

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::services::scorer::WrongQuestion;

/// 学习指南生成模型的接缝
///
/// 流水线只依赖这个 trait；生产环境注入 [`LlmService`]，
/// 测试注入固定响应的假实现。
#[async_trait]
pub trait GuideModel: Send + Sync {
    /// 发送提示词，返回模型的自由文本响应
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 生成学习指南文本
/// - 单次往返，调用失败不重试（由 worker 记录日志后放弃本次流水线）
/// - 不出现 Quiz / Submission，只处理字符串进出
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        // 构建消息列表
        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        // 添加用户消息
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.3)
            .max_tokens(2048u32)
            .build()?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl GuideModel for LlmService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.send_to_llm(prompt, None).await
    }
}

/// 构建学习指南提示词
///
/// 提示词是确定性模板：嵌入每道答错题目的题干，以及一段固定的
/// 指令块，要求严格按纯文本文法输出恰好五道练习题。
/// 下游的 `guide_parser` 依赖这里声明的行格式。
pub fn build_guide_prompt(quiz_title: &str, wrong_questions: &[WrongQuestion]) -> String {
    let mut prompt = format!(
        "A student needs help with a '{}' quiz. They answered these questions incorrectly:\n\n",
        quiz_title
    );

    for question in wrong_questions {
        prompt.push_str(&format!("- Question: {}\n", question.text));
    }

    prompt.push_str(
        "\nPlease generate a simple, friendly study guide explaining the key concepts \
         for these questions. Do not over-explain.\n\
         After the study guide, write exactly five practice questions. \
         Each practice question must follow this exact plain-text layout, \
         with the lines in this order and nothing between them:\n\
         Fundamental Topic: <the concept being tested>\n\
         Practice Question: <the question text>\n\
         A) <first option>\n\
         B) <second option>\n\
         C) <third option>\n\
         D) <fourth option>\n\
         Correct Answer: <one letter: A, B, C or D>\n\
         Make sure you are not hinting that you are an AI model, so limit greetings and outros.\n\
         IMPORTANT: The entire response must be plain text only, with no Markdown formatting \
         (no ##, *, or lists) or anything that is not plain text.",
    );

    prompt
}
