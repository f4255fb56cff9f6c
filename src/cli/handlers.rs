use std::{io::Read, sync::Arc};

use anyhow::Context;
use tokio::sync::mpsc::channel;
use tracing::{debug, error, info};

use crate::{
    bot::{self, Dispatcher},
    cli::commands::{Cli, Command},
    client::stream::{ResponseStreamer, Streamer},
    config::{BotConfig, GeminiConfig},
    prompts::{Catalog, RenderedPrompt, Router, TemplateDefinition, TemplateEngine},
    telegram::TelegramClient,
};

/// Execute the subcommand selected on the command line
pub struct CommandHandler<'a> {
    cli: &'a Cli,
}

impl<'a> CommandHandler<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self { cli }
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let catalog = Catalog::load(self.cli.catalog.as_deref()).context("Invalid template catalog")?;
        let router = Router::new(Arc::new(catalog));

        match &self.cli.command {
            Command::Run => self.run(router).await,
            Command::Templates => {
                print!("{}", list_templates(router.catalog()));
                Ok(())
            }
            Command::Render { command, args } => {
                let (_, prompt) = render(&router, command, &self.arguments(args)?)?;
                println!("{}", prompt.text);
                Ok(())
            }
            Command::Generate { command, args } => self.generate(&router, command, &self.arguments(args)?).await,
        }
    }

    /// Arguments from the command line, or from stdin when none are given and it is piped
    fn arguments(&self, args: &[String]) -> anyhow::Result<String> {
        if args.is_empty() && !atty::is(atty::Stream::Stdin) {
            debug!("Reading arguments from stdin");
            let mut stdin_str = String::new();
            std::io::stdin().lock().read_to_string(&mut stdin_str)?;
            return Ok(stdin_str.trim().to_string());
        }

        Ok(args.join(" "))
    }

    async fn run(&self, router: Router) -> anyhow::Result<()> {
        let config = BotConfig::from_cli(self.cli)?;
        let telegram = TelegramClient::new(config.telegram_token.clone());
        let gemini = config.gemini.client();

        info!(
            model = gemini.model(),
            templates = router.catalog().templates().len(),
            "Starting bot"
        );

        let dispatcher = Arc::new(Dispatcher::new(router, gemini, telegram.clone()));
        bot::runner::run(dispatcher, telegram, config.poll, bot::runner::ctrl_c()).await?;
        Ok(())
    }

    /// Render the prompt and write the answer to stdout as it is streamed
    async fn generate(&self, router: &Router, command: &str, args: &str) -> anyhow::Result<()> {
        let (template, prompt) = render(router, command, args)?;
        let client = GeminiConfig::from_cli(self.cli)?.client();
        let engine = TemplateEngine::new();

        let stream = client.stream(&prompt.text).await?;

        debug!("Creating channels");
        let (sender, receiver) = channel(32);
        let streamer = ResponseStreamer;
        let streamer_clone = streamer.clone();

        print!("{}", engine.substitute(&template.header, &prompt.bindings));

        // Write the stream to stdout
        let job = tokio::spawn(async move {
            let mut writer = tokio::io::stdout();
            streamer_clone
                .write_at_end(&mut writer, receiver)
                .await
                .unwrap_or_else(|e| {
                    error!(%e, "Error writing stream");
                });
        });

        let answer = streamer.handle_stream(std::pin::pin!(stream), sender).await?;
        job.await?;

        match &template.footer {
            Some(footer) => println!("{}", engine.substitute(footer, &prompt.bindings)),
            None => println!(),
        }

        info!(len = answer.len(), "Answer collected");
        Ok(())
    }
}

/// Resolve the command and render its prompt; invalid input reports the command usage
fn render<'r>(router: &'r Router, command: &str, args: &str) -> anyhow::Result<(&'r TemplateDefinition, RenderedPrompt)> {
    let template = router.resolve(command)?;
    let prompt = TemplateEngine::new()
        .render(args, template)
        .with_context(|| template.usage.clone())?;
    for (name, value) in prompt.bindings.iter() {
        debug!(name, value, "Field bound");
    }
    Ok((template, prompt))
}

/// One line per command: `/post (post): topic, platform [Instagram], tone [profesjonalny]`
fn list_templates(catalog: &Catalog) -> String {
    let mut out = String::new();
    for template in catalog.templates() {
        let fields = template
            .fields
            .iter()
            .map(|f| match f.default_value() {
                Some(default) => format!("{} [{}]", f.name, default),
                None => f.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("/{} ({}): {}\n", template.command, template.id, fields));
    }
    out
}
