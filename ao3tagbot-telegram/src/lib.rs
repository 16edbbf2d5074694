mod api;

use std::sync::Arc;

use ao3tagbot_common::{utils, Conf, Context as _, Report};
use ao3tagbot_scrape::Pipeline;
use futures::StreamExt as _;
use tracing::Instrument as _;

pub use crate::api::{Api, Chat, Message, SendMessage, Update, User};

static START_TEXT: &str = "Hello! AO3 Tag Bot responds to messages containing AO3 links with the tags of the linked story";
static HELP_TEXT: &str = "AO3 Tag Bot responds to messages containing AO3 links with the tags of the linked story";

#[tracing::instrument(skip(conf), err)]
pub async fn run(conf: &Conf) -> Result<(), Report> {
    let pipeline = Pipeline::from_conf(conf).context("unable to set up the archive fetcher")?;
    let api = Api::new(&conf.token)?;

    let me = api
        .get_me()
        .await
        .context("unable to reach telegram, check the bot token")?;

    tracing::info!(
        username = me.username.as_deref().unwrap_or(&me.first_name),
        "connected to telegram"
    );

    poll(Arc::new(api), Arc::new(pipeline)).await
}

/// Long-polls for updates forever, handing each message to its own task.
pub async fn poll(api: Arc<Api>, pipeline: Arc<Pipeline>) -> Result<(), Report> {
    let mut offset = None;

    loop {
        let updates = match api.get_updates(offset).await {
            Ok(updates) => updates,
            Err(err) => {
                tracing::error!(error = ?err, "unable to poll for updates");

                utils::sleep().await;

                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);

            let message = match update.message {
                Some(message) => message,
                None => continue,
            };

            let span = tracing::info_span!(
                "message",
                chat_id = message.chat.id,
                message_id = message.message_id
            );

            tokio::spawn(handle(api.clone(), pipeline.clone(), message).instrument(span));
        }
    }
}

pub async fn handle(api: Arc<Api>, pipeline: Arc<Pipeline>, message: Message) {
    let text = match message.content() {
        Some(text) => text,
        None => return,
    };

    if let Some(command) = parse_command(text) {
        let reply = match command {
            "start" => Some(START_TEXT),
            "help" => Some(HELP_TEXT),
            _ => None,
        };

        if let Some(reply) = reply {
            tracing::info!("responding to /{} in chat {}", command, message.chat.full_name());

            if let Err(err) = api.send_message(&SendMessage::reply(&message, reply)).await {
                tracing::error!(error = ?err, "unable to answer command");
            }

            return;
        }
    }

    let replies = pipeline.replies(text);
    futures::pin_mut!(replies);

    while let Some((id, reply)) = replies.next().await {
        tracing::debug!(story_id = %id, "replying");

        if let Err(err) = api
            .send_message(&SendMessage::markdown_reply(&message, &reply))
            .await
        {
            tracing::error!(story_id = %id, error = ?err, "unable to send reply");
        }
    }
}

/// `/help@SomeBot args` → `help`.
fn parse_command(text: &str) -> Option<&str> {
    let word = text.split_whitespace().next()?;
    let command = word.strip_prefix('/')?.split('@').next()?;

    if command.is_empty() {
        None
    } else {
        Some(command)
    }
}
