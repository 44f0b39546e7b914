use chrono::Local;

use crate::client::{Attachment, ChatUpload, FinanceApi};

pub const WELCOME: &str = "Welcome to the SDG Finance ChatBot! Ask me anything about sustainable finance, eco-friendly products, or socially responsible investing. For example: \"How can I invest sustainably?\"";
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong.";
const UPLOAD_ONLY_MESSAGE: &str = "File upload";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: Option<String>,
    /// File name of an attached image.
    pub image: Option<String>,
    pub file: Option<String>,
    pub timestamp: String,
}

impl ChatMessage {
    fn bot(text: &str) -> Self {
        Self {
            sender: Sender::Bot,
            text: Some(text.to_string()),
            image: None,
            file: None,
            timestamp: now(),
        }
    }

    fn user() -> Self {
        Self {
            sender: Sender::User,
            text: None,
            image: None,
            file: None,
            timestamp: now(),
        }
    }
}

fn now() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Which input line receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatInput {
    Message,
    ImagePath,
    FilePath,
}

#[derive(Debug)]
pub struct ChatState {
    pub history: Vec<ChatMessage>,
    pub input: String,
    pub path_input: String,
    pub composing: Option<ChatInput>,
    pub image: Option<Attachment>,
    pub file: Option<Attachment>,
    pub typing: bool,
    pending: Option<ChatUpload>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            history: vec![ChatMessage::bot(WELCOME)],
            input: String::new(),
            path_input: String::new(),
            composing: None,
            image: None,
            file: None,
            typing: false,
            pending: None,
        }
    }
}

impl ChatState {
    /// Appends the user's entries and queues the request. Returns `false`
    /// when there is nothing to send.
    pub fn begin_send(&mut self) -> bool {
        let text = self.input.trim().to_string();
        if text.is_empty() && self.image.is_none() && self.file.is_none() {
            return false;
        }

        let image = self.image.take();
        let file = self.file.take();
        if let Some(image) = &image {
            self.history.push(ChatMessage {
                image: Some(image.file_name.clone()),
                ..ChatMessage::user()
            });
        }
        if let Some(file) = &file {
            self.history.push(ChatMessage {
                file: Some(file.file_name.clone()),
                ..ChatMessage::user()
            });
        }
        if !text.is_empty() {
            self.history.push(ChatMessage {
                text: Some(text.clone()),
                ..ChatMessage::user()
            });
        }

        self.input.clear();
        self.typing = true;
        self.pending = Some(ChatUpload {
            message: if text.is_empty() {
                UPLOAD_ONLY_MESSAGE.to_string()
            } else {
                text
            },
            image,
            file,
        });
        true
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Sends the queued request and appends the bot's answer.
    pub async fn finish_send(&mut self, api: &dyn FinanceApi, token: &str) {
        let Some(upload) = self.pending.take() else {
            return;
        };
        let reply = match api.send_chat(token, &upload).await {
            Ok(reply) => reply.reply,
            Err(err) => {
                tracing::error!(%err, "chatbot request failed");
                FALLBACK_REPLY.to_string()
            }
        };
        self.history.push(ChatMessage::bot(&reply));
        self.typing = false;
    }

    pub fn attach(&mut self, kind: ChatInput, attachment: Attachment) {
        match kind {
            ChatInput::ImagePath => self.image = Some(attachment),
            ChatInput::FilePath => self.file = Some(attachment),
            ChatInput::Message => {}
        }
    }

    pub fn clear_attachments(&mut self) {
        self.image = None;
        self.file = None;
    }

    /// Restores the conversation to the welcome message.
    pub fn reset_history(&mut self) {
        self.history = vec![ChatMessage::bot(WELCOME)];
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
