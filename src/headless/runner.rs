//! Headless mode runner - terminal chat loop
//!
//! Reads one line per turn from stdin. A number picks a suggested prompt
//! while they are still shown; `q`/`quit` exits. Each turn runs the engine
//! until the reply (or the deadline) has landed, then renders the events.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use smoothie_app::config::{clean_api_base, resolve_settings, validate_settings, Settings};
use smoothie_app::{ChatClient, ChatTransport, EngineEvent, HeadlessSurface, Message, Runtime};
use smoothie_core::prelude::*;
use smoothie_core::{BuildMode, ChatMessage, Role, ViewportMetrics};

use super::HeadlessEvent;

/// Window the headless widget pretends to have
const HEADLESS_VIEWPORT: (f64, f64) = (1280.0, 800.0);

/// Options for `smoothie chat`
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Directory holding `.smoothie/config.toml`
    pub project_path: PathBuf,
    /// NDJSON instead of text
    pub json: bool,
    pub api_base: Option<String>,
    pub production: bool,
}

/// Settings from config and environment, then command-line overrides
pub fn resolve_chat_settings(options: &ChatOptions) -> Result<Settings> {
    let mut settings = resolve_settings(&options.project_path);
    if let Some(base) = &options.api_base {
        settings.api.base_url = clean_api_base(base);
    }
    if options.production {
        settings.build.mode = BuildMode::Production;
    }
    validate_settings(&settings)?;
    Ok(settings)
}

/// Run the chat loop on stdin/stdout
pub async fn run_headless_chat(options: ChatOptions) -> Result<()> {
    let settings = resolve_chat_settings(&options)?;
    info!(
        "Headless chat against {} ({})",
        settings.api.base_url, settings.build.mode
    );

    let client = ChatClient::new(&settings.api.base_url)?;
    let mut repl = ChatRepl::new(settings, client, options.json);
    let mut out = io::stdout();
    repl.start(&mut out)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !repl.handle_line(&line, &mut out).await? {
            break;
        }
    }

    repl.shutdown(&mut out)?;
    info!("Headless chat exiting");
    Ok(())
}

/// One widget instance fed from text lines
pub struct ChatRepl<T> {
    runtime: Runtime<HeadlessSurface, T>,
    json: bool,
}

impl<T> ChatRepl<T>
where
    T: ChatTransport + Send + Sync + 'static,
{
    pub fn new(settings: Settings, transport: T, json: bool) -> Self {
        let (_, height) = HEADLESS_VIEWPORT;
        Self {
            runtime: Runtime::new(settings, HeadlessSurface::new(height), Arc::new(transport)),
            json,
        }
    }

    /// Mount the widget and print the greeting and prompts
    pub fn start<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let (width, height) = HEADLESS_VIEWPORT;
        self.runtime.dispatch(Message::Mount {
            metrics: ViewportMetrics::new(width, height),
            is_ios: false,
        });

        let state = &self.runtime.engine().state;
        let api_base = state.settings.api.base_url.clone();
        let class = state.device.class();
        let greeting = state.session.messages().to_vec();
        let prompts = state.session.suggested_prompts();

        if self.json {
            HeadlessEvent::mounted(class, &api_base).write_json(out)?;
        } else {
            writeln!(out, "Smoothie assistant ({})", api_base)?;
        }
        for (index, message) in greeting.iter().enumerate() {
            self.render_message(out, index, message)?;
        }
        if self.json {
            HeadlessEvent::prompts(prompts).write_json(out)?;
        } else {
            for (n, prompt) in prompts.iter().enumerate() {
                writeln!(out, "  {}. {}", n + 1, prompt)?;
            }
        }

        self.runtime.take_events();
        Ok(())
    }

    /// Handle one input line. Returns `false` when the user asked to quit.
    pub async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<bool> {
        let text = line.trim();
        match text {
            "" => return Ok(true),
            "q" | "quit" | "exit" => return Ok(false),
            _ => {}
        }

        match self.pick_prompt(text) {
            Some(prompt) => self.runtime.dispatch(Message::SendPrompt(prompt.to_string())),
            None => {
                self.runtime.dispatch(Message::DraftChanged(text.to_string()));
                self.runtime.dispatch(Message::Send);
            }
        }
        self.render_events(out)?;

        self.runtime.run_until_idle().await;
        self.render_events(out)?;
        Ok(true)
    }

    pub fn shutdown<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.runtime.dispatch(Message::Unmount);
        self.render_events(out)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.runtime.engine().state.session.messages()
    }

    /// `"2"` selects the second suggested prompt while they are visible
    fn pick_prompt(&self, text: &str) -> Option<&'static str> {
        let session = &self.runtime.engine().state.session;
        if !session.show_prompt_buttons() {
            return None;
        }
        let n: usize = text.parse().ok()?;
        session.suggested_prompts().get(n.checked_sub(1)?).copied()
    }

    fn render_events<W: Write>(&mut self, out: &mut W) -> Result<()> {
        for event in self.runtime.take_events() {
            if self.json {
                HeadlessEvent::from_engine(&event).write_json(out)?;
                continue;
            }
            match event {
                EngineEvent::MessageAppended { index, message } => {
                    self.render_message(out, index, &message)?;
                }
                EngineEvent::TypingChanged { typing: true } => writeln!(out, "  ...")?,
                other => trace!("Not rendered in text mode: {}", other.event_type()),
            }
        }
        Ok(())
    }

    fn render_message<W: Write>(&self, out: &mut W, index: usize, message: &ChatMessage) -> Result<()> {
        if self.json {
            HeadlessEvent::message(index, message).write_json(out)?;
            return Ok(());
        }

        let who = match message.role {
            Role::User => "You",
            Role::Assistant => "Assistant",
        };
        write!(out, "[{}] {}: {}", message.formatted_time(), who, message.content)?;
        if let Some(price) = message.price_label() {
            write!(out, " {}", price)?;
        }
        writeln!(out)?;
        if message.show_image {
            match &message.image_path {
                Some(path) => writeln!(out, "  image: {}", path)?,
                None => warn!("Message {} flagged show_image without a path", index),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smoothie_core::{ChatFailure, ChatReply, ChatRequest, Intent};
    use tempfile::tempdir;

    /// Replies with a fixed recommendation after a short delay
    struct Canned;

    impl ChatTransport for Canned {
        async fn send(&self, _request: &ChatRequest) -> std::result::Result<ChatReply, ChatFailure> {
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            Ok(ChatReply {
                explanation: Some("Try the Mango Tango.".into()),
                intent: Intent::NewRequest,
                id: Some("mango_tango".into()),
                name: Some("Mango Tango".into()),
                price_usd: Some(6.5),
                ..Default::default()
            })
        }
    }

    /// Always fails with a server error
    struct Broken;

    impl ChatTransport for Broken {
        async fn send(&self, _request: &ChatRequest) -> std::result::Result<ChatReply, ChatFailure> {
            Err(ChatFailure::http(500, Some("Internal Server Error"), "db down"))
        }
    }

    fn lines(buf: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8_lossy(buf)
            .lines()
            .map(|l| serde_json::from_str(l).expect("invalid JSON line"))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_json_start_prints_greeting_and_prompts() {
        let mut repl = ChatRepl::new(Settings::default(), Canned, true);
        let mut out = Vec::new();
        repl.start(&mut out).unwrap();

        let events = lines(&out);
        assert_eq!(events[0]["event"], "mounted");
        assert_eq!(events[0]["layout"], "desktop");
        assert_eq!(events[1]["event"], "message");
        assert_eq!(events[1]["role"], "assistant");
        assert_eq!(events[2]["event"], "prompts");
        assert_eq!(events[2]["prompts"].as_array().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_numbered_prompt_round_trip() {
        let mut repl = ChatRepl::new(Settings::default(), Canned, true);
        let mut sink = Vec::new();
        repl.start(&mut sink).unwrap();

        let mut out = Vec::new();
        assert!(repl.handle_line("1", &mut out).await.unwrap());

        let messages = repl.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].content, smoothie_core::chat::SUGGESTED_PROMPTS[0]);

        let events = lines(&out);
        let kinds: Vec<_> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
        assert_eq!(
            kinds,
            vec!["prompts_hidden", "message", "typing", "message", "typing"]
        );
        assert_eq!(events[3]["price"], "($6.50)");
    }

    #[tokio::test(start_paused = true)]
    async fn test_number_is_plain_text_after_prompts_hidden() {
        let mut repl = ChatRepl::new(Settings::default(), Canned, true);
        let mut sink = Vec::new();
        repl.start(&mut sink).unwrap();
        repl.handle_line("hello", &mut sink).await.unwrap();
        repl.handle_line("2", &mut sink).await.unwrap();

        assert_eq!(repl.messages()[3].content, "2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_and_quit_lines() {
        let mut repl = ChatRepl::new(Settings::default(), Canned, false);
        let mut out = Vec::new();
        repl.start(&mut out).unwrap();
        out.clear();

        assert!(repl.handle_line("   ", &mut out).await.unwrap());
        assert!(out.is_empty());
        assert!(!repl.handle_line("quit", &mut out).await.unwrap());
        assert_eq!(repl.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_text_mode_renders_error_detail() {
        let mut repl = ChatRepl::new(Settings::default(), Broken, false);
        let mut out = Vec::new();
        repl.start(&mut out).unwrap();
        out.clear();

        repl.handle_line("anything", &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("You: anything"));
        assert!(text.contains("Assistant: ⚠️ Error:"));
    }

    #[test]
    fn test_cli_overrides_config() {
        let temp = tempdir().unwrap();
        let options = ChatOptions {
            project_path: temp.path().to_path_buf(),
            json: false,
            api_base: Some("https://api.example.com # staging".into()),
            production: true,
        };

        let settings = resolve_chat_settings(&options).unwrap();
        assert_eq!(settings.api.base_url, "https://api.example.com");
        assert_eq!(settings.build.mode, BuildMode::Production);
    }

    #[test]
    fn test_invalid_api_base_rejected() {
        let temp = tempdir().unwrap();
        let options = ChatOptions {
            project_path: temp.path().to_path_buf(),
            api_base: Some("ftp://example.com".into()),
            ..Default::default()
        };
        assert!(resolve_chat_settings(&options).is_err());
    }
}
