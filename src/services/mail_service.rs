//! 邮件服务 - 业务能力层
//!
//! 只负责"把学习指南 PDF 发给学生"能力：固定的主题/正文模板，
//! PDF 作为唯一附件。发送失败由 worker 捕获记录，既不会影响
//! 已经返回的提交确认，也不会导致调度器崩溃。
//!
//! `GuideNotifier` trait 是流水线与邮件传输之间的接缝，
//! 测试中可以换成只记录调用的假实现。

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, warn};

use crate::config::Config;

/// 附件在邮件中显示的文件名
const ATTACHMENT_NAME: &str = "study_guide.pdf";

/// 学习指南通知的接缝
#[async_trait]
pub trait GuideNotifier: Send + Sync {
    /// 把 `pdf_path` 处的学习指南发送给 `to`
    async fn send_guide(
        &self,
        to: &str,
        quiz_title: &str,
        student_name: &str,
        pdf_path: &Path,
    ) -> Result<()>;
}

/// SMTP 邮件服务
pub struct MailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl MailService {
    /// 创建新的邮件服务
    ///
    /// 凭据为空时以匿名方式连接（本地调试 relay 的场景）
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_relay)
            .with_context(|| format!("无法配置 SMTP relay: {}", config.smtp_relay))?;

        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(Self {
            mailer: builder.build(),
            from: config.mail_from.clone(),
        })
    }

    /// 构建带 PDF 附件的邮件
    ///
    /// 主题与正文是固定模板，与原有的学习指南邮件文案保持一致
    pub fn build_message(
        &self,
        to: &str,
        quiz_title: &str,
        student_name: &str,
        pdf_bytes: Vec<u8>,
    ) -> Result<Message> {
        let from: Mailbox = self
            .from
            .parse()
            .with_context(|| format!("发件人地址无效: {}", self.from))?;
        let to: Mailbox = to
            .parse()
            .with_context(|| format!("收件人地址无效: {}", to))?;

        let body = format!(
            "Hello {},\n\nHere is your study guide based on the questions you missed. \
             Keep up the great work!",
            student_name
        );

        let attachment = Attachment::new(ATTACHMENT_NAME.to_string())
            .body(pdf_bytes, ContentType::parse("application/pdf")?);

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(format!(
                "Your Personalized Study Guide for '{}'",
                quiz_title
            ))
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body),
                    )
                    .singlepart(attachment),
            )?;

        Ok(message)
    }
}

#[async_trait]
impl GuideNotifier for MailService {
    async fn send_guide(
        &self,
        to: &str,
        quiz_title: &str,
        student_name: &str,
        pdf_path: &Path,
    ) -> Result<()> {
        let pdf_bytes = tokio::fs::read(pdf_path)
            .await
            .with_context(|| format!("无法读取 PDF 附件: {}", pdf_path.display()))?;

        let message = self.build_message(to, quiz_title, student_name, pdf_bytes)?;

        debug!("📧 正在发送学习指南邮件至 {}", to);
        self.mailer.send(message).await.map_err(|e| {
            warn!("邮件发送失败: {}", e);
            anyhow::anyhow!("邮件发送失败: {}", e)
        })?;

        debug!("✓ 学习指南邮件已发送");
        Ok(())
    }
}
