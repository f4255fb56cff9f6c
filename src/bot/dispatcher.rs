use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::{
    errors::BotError,
    messages::{HELP_FOOTER, HELP_HEADER, WELCOME},
};
use crate::{
    client::{GenerationError, Generator},
    prompts::{Bindings, CONVERSATION, CONVERSATION_FAILURE, Router, TemplateDefinition, TemplateEngine},
    telegram::{MESSAGE_LIMIT, Transport, split_message},
};

/// Telegram hides the typing indicator after about five seconds
const TYPING_REFRESH: Duration = Duration::from_secs(4);

/// An inbound text message
#[derive(Debug, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// `/name@bot words...`; the arguments are the words re-joined with single spaces
    Command { name: &'a str, args: String },
    Text(&'a str),
}

impl<'a> Inbound<'a> {
    pub fn parse(text: &'a str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let Some(command) = text.strip_prefix('/') else {
            return Some(Self::Text(text));
        };

        let (head, rest) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
        let name = head.split_once('@').map_or(head, |(name, _)| name);
        if name.is_empty() {
            return Some(Self::Text(text));
        }

        Some(Self::Command {
            name,
            args: rest.split_whitespace().collect::<Vec<_>>().join(" "),
        })
    }
}

/// Turn one inbound message into the replies sent back to its chat
pub struct Dispatcher<G, T> {
    router: Router,
    engine: TemplateEngine,
    generator: G,
    transport: T,
}

impl<G: Generator, T: Transport> Dispatcher<G, T> {
    pub fn new(router: Router, generator: G, transport: T) -> Self {
        Self {
            router,
            engine: TemplateEngine::new(),
            generator,
            transport,
        }
    }

    /// Handle a message. Only a failure to deliver a reply is returned as an error;
    /// every other failure is answered in the chat.
    pub async fn handle(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        match Inbound::parse(text) {
            None => {
                debug!(chat_id, "Ignoring empty message");
                Ok(())
            }
            Some(Inbound::Command { name: "start", .. }) => self.reply(chat_id, WELCOME).await,
            Some(Inbound::Command { name: "help", .. }) => self.reply(chat_id, &self.help()).await,
            Some(Inbound::Command { name, args }) => match self.router.resolve(name) {
                Ok(template) => self.handle_template(chat_id, template, &args).await,
                Err(e) => {
                    debug!(%e, "Unknown command, answering as conversation");
                    self.handle_conversation(chat_id, text).await
                }
            },
            Some(Inbound::Text(text)) => self.handle_conversation(chat_id, text).await,
        }
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// The help text, listing the commands of the catalog in use
    pub fn help(&self) -> String {
        let mut help = HELP_HEADER.to_string();
        for template in self.router.catalog().templates() {
            if !template.description.is_empty() {
                help.push_str("\n\n");
                help.push_str(&template.description);
            }
        }
        help.push_str("\n\n");
        help.push_str(HELP_FOOTER);
        help
    }

    async fn handle_template(
        &self,
        chat_id: i64,
        template: &TemplateDefinition,
        args: &str,
    ) -> Result<(), BotError> {
        info!(chat_id, command = %template.command, "Command received");

        let prompt = match self.engine.render(args, template) {
            Ok(prompt) => prompt,
            Err(e) => {
                debug!(%e, template = %template.id, "Invalid arguments");
                return self.reply(chat_id, &template.usage).await;
            }
        };

        if !template.progress.is_empty() {
            let progress = self.engine.substitute(&template.progress, &prompt.bindings);
            self.reply(chat_id, &progress).await?;
        }

        match self.generate(chat_id, &prompt.text).await {
            Ok(answer) => {
                let mut reply = self.engine.substitute(&template.header, &prompt.bindings);
                reply.push_str(&answer);
                if let Some(footer) = &template.footer {
                    reply.push_str(&self.engine.substitute(footer, &prompt.bindings));
                }
                self.reply(chat_id, &reply).await
            }
            Err(e) => {
                error!(%e, template = %template.id, "Error generating content");
                let failure = self.engine.substitute(&template.failure, &prompt.bindings);
                self.reply(chat_id, &failure).await
            }
        }
    }

    async fn handle_conversation(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        info!(chat_id, "Message received");
        debug!(%text, "User message");

        let bindings: Bindings = [("message", text)].into_iter().collect();
        let prompt = self.engine.substitute(CONVERSATION, &bindings);

        match self.generate(chat_id, &prompt).await {
            Ok(answer) => self.reply(chat_id, &answer).await,
            Err(e) => {
                error!(%e, "Error handling message");
                self.reply(chat_id, CONVERSATION_FAILURE).await
            }
        }
    }

    /// Call the generator, keeping the typing indicator visible while it works
    async fn generate(&self, chat_id: i64, prompt: &str) -> Result<String, GenerationError> {
        self.typing(chat_id).await;

        let generation = self.generator.generate(prompt);
        tokio::pin!(generation);

        let mut refresh = tokio::time::interval(TYPING_REFRESH);
        // The first tick is immediate
        refresh.tick().await;

        loop {
            tokio::select! {
                biased;
                result = &mut generation => return result,
                _ = refresh.tick() => self.typing(chat_id).await,
            }
        }
    }

    async fn typing(&self, chat_id: i64) {
        if let Err(e) = self.transport.send_typing(chat_id).await {
            warn!(%e, chat_id, "Failed to send typing indicator");
        }
    }

    /// Send `text`, split into as many messages as Telegram needs
    async fn reply(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        let parts = split_message(text, MESSAGE_LIMIT);
        if parts.len() > 1 {
            debug!(chat_id, parts = parts.len(), "Splitting long reply");
        }

        for part in parts {
            self.transport.send_message(chat_id, part).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::provider::tests::TestGenerator;
    use crate::prompts::Catalog;
    use crate::telegram::tests::TestTransport;

    const CHAT: i64 = 42;

    fn dispatcher(generator: TestGenerator) -> Dispatcher<TestGenerator, TestTransport> {
        let catalog = Arc::new(Catalog::builtin().expect("valid builtin catalog"));
        Dispatcher::new(Router::new(catalog), generator, TestTransport::default())
    }

    #[test]
    fn parse_command() {
        assert_eq!(
            Inbound::parse("/post Eco product | Twitter"),
            Some(Inbound::Command {
                name: "post",
                args: "Eco product | Twitter".to_string()
            })
        );
        assert_eq!(
            Inbound::parse("  /post@MarketingBot   Kawa\n z   mlekiem  "),
            Some(Inbound::Command {
                name: "post",
                args: "Kawa z mlekiem".to_string()
            })
        );
        assert_eq!(
            Inbound::parse("/help"),
            Some(Inbound::Command {
                name: "help",
                args: String::new()
            })
        );
    }

    #[test]
    fn parse_text() {
        assert_eq!(Inbound::parse("Stwórz post o kawie"), Some(Inbound::Text("Stwórz post o kawie")));
        assert_eq!(Inbound::parse("/ post"), Some(Inbound::Text("/ post")));
        assert_eq!(Inbound::parse("/"), Some(Inbound::Text("/")));
        assert_eq!(Inbound::parse("  \n "), None);
    }

    #[tokio::test]
    async fn post_command_replies_with_generated_text() {
        let dispatcher = dispatcher(TestGenerator::new("Kawa to życie ☕"));

        dispatcher
            .handle(CHAT, "/post Kawa | Twitter | casual")
            .await
            .expect("handle");

        let prompts = dispatcher.generator.received();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Temat: Kawa"));
        assert!(prompts[0].contains("Platforma: Twitter"));
        assert!(prompts[0].contains("Ton: casual"));

        assert_eq!(
            dispatcher.transport.sent(),
            vec![
                "✍️ Tworzę post... Chwilę!".to_string(),
                "📱 Post (Twitter):\n\nKawa to życie ☕".to_string(),
            ]
        );
        assert!(!dispatcher.transport.typing.lock().expect("typing lock").is_empty());
    }

    #[tokio::test]
    async fn long_reply_is_split() {
        let answer = format!("{}\n{}", "🚀".repeat(1500), "x".repeat(2000));
        let dispatcher = dispatcher(TestGenerator::new(&answer));

        dispatcher.handle(CHAT, "/thread Produktywność").await.expect("handle");

        let sent = dispatcher.transport.sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0], "✍️ Tworzę thread... To może chwilę potrwać!");
        assert_eq!(sent[1], format!("🧵 Thread:\n\n{}\n", "🚀".repeat(1500)));
        assert_eq!(sent[2], "x".repeat(2000));
        assert!(sent.iter().all(|m| m.encode_utf16().count() <= MESSAGE_LIMIT));
    }

    #[tokio::test]
    async fn script_header_uses_defaults() {
        let dispatcher = dispatcher(TestGenerator::new("SCENA 1"));

        dispatcher.handle(CHAT, "/script Nowy produkt").await.expect("handle");

        let sent = dispatcher.transport.sent();
        assert_eq!(sent.last().expect("reply"), "🎬 Skrypt (30s, TikTok):\n\nSCENA 1");
    }

    #[tokio::test]
    async fn image_command_has_footer_and_progress() {
        let dispatcher = dispatcher(TestGenerator::new("A minimalist logo"));

        dispatcher.handle(CHAT, "/image Logo firmy tech").await.expect("handle");

        let sent = dispatcher.transport.sent();
        assert_eq!(sent[0], "🎨 Generuję obraz: Logo firmy tech...");
        assert!(sent[1].starts_with("🎨 **Prompt do generowania obrazu:**\n\nA minimalist logo\n\nℹ️"));
        assert!(sent[1].ends_with("• Google Imagen 3"));
    }

    #[tokio::test]
    async fn missing_arguments_reply_with_usage() {
        let dispatcher = dispatcher(TestGenerator::new("unused"));

        dispatcher.handle(CHAT, "/post").await.expect("handle");
        dispatcher.handle(CHAT, "/post | Twitter").await.expect("handle");

        assert!(dispatcher.generator.received().is_empty());
        assert_eq!(
            dispatcher.transport.sent(),
            vec![
                "❌ Podaj temat posta!\nPrzykład: /post Nowy produkt eco-friendly".to_string(),
                "❌ Podaj temat posta!\nPrzykład: /post Nowy produkt eco-friendly".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn generation_failure_replies_with_apology() {
        let dispatcher = dispatcher(TestGenerator::failing());

        dispatcher.handle(CHAT, "/email Black Friday").await.expect("handle");

        assert_eq!(
            dispatcher.transport.sent().last().expect("reply"),
            "❌ Wystąpił błąd podczas generowania emaila. Spróbuj ponownie!"
        );
    }

    #[tokio::test]
    async fn free_text_goes_to_conversation() {
        let dispatcher = dispatcher(TestGenerator::new("Chętnie pomogę!"));

        dispatcher.handle(CHAT, "Stwórz post o kawie").await.expect("handle");

        let prompts = dispatcher.generator.received();
        assert!(prompts[0].contains(r#"Użytkownik napisał: "Stwórz post o kawie""#));
        assert_eq!(dispatcher.transport.sent(), vec!["Chętnie pomogę!".to_string()]);
    }

    #[tokio::test]
    async fn unknown_command_goes_to_conversation() {
        let dispatcher = dispatcher(TestGenerator::new("Nie znam tej komendy"));

        dispatcher.handle(CHAT, "/newsletter Wiosna").await.expect("handle");

        let prompts = dispatcher.generator.received();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("/newsletter Wiosna"));
    }

    #[tokio::test]
    async fn conversation_failure_replies_with_apology() {
        let dispatcher = dispatcher(TestGenerator::failing());

        dispatcher.handle(CHAT, "hej").await.expect("handle");

        assert_eq!(dispatcher.transport.sent(), vec![CONVERSATION_FAILURE.to_string()]);
    }

    #[tokio::test]
    async fn start_and_help_are_static() {
        let dispatcher = dispatcher(TestGenerator::new("unused"));

        dispatcher.handle(CHAT, "/start").await.expect("handle");
        dispatcher.handle(CHAT, "/help@MarketingBot").await.expect("handle");

        assert!(dispatcher.generator.received().is_empty());

        let sent = dispatcher.transport.sent();
        assert_eq!(sent[0], WELCOME);
        assert!(sent[1].starts_with(HELP_HEADER));
        assert!(sent[1].contains("/image <opis> - Prompt do generowania obrazu AI"));
        assert!(sent[1].ends_with(HELP_FOOTER));
    }
}
