//! Discord integration: the chat collaborator that feeds the dispatcher.
//!
//! Thin by design. Parses prefixed messages into commands, hands them to
//! the dispatcher, and delivers the reply chunks in order.

use crate::commands::{CommandDispatcher, IncomingCommand};
use serenity::all::{Client, Context, EventHandler, GatewayIntents, Message, Ready};
use serenity::async_trait;
use std::sync::Arc;

struct DiscordHandler {
    dispatcher: Arc<CommandDispatcher>,
    prefix: char,
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        log::info!("[DISCORD] Connected as {}", ready.user.name);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(command) = IncomingCommand::parse(&msg.content, self.prefix, &msg.author.name)
        else {
            return;
        };

        let reply = self.dispatcher.dispatch(command).await;
        for chunk in reply.chunks {
            if let Err(e) = msg.channel_id.say(&ctx.http, chunk).await {
                log::error!("[DISCORD] Failed to send reply: {}", e);
                break;
            }
        }
    }
}

/// Build and run the Discord gateway client until it shuts down.
pub async fn run(
    token: &str,
    dispatcher: Arc<CommandDispatcher>,
    prefix: char,
) -> Result<(), serenity::Error> {
    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(token, intents)
        .event_handler(DiscordHandler { dispatcher, prefix })
        .await?;

    client.start().await
}
