//! Line-based chat transport over stdin/stdout.
//!
//! Every message is handled on its own task so a slow lookup never holds up the
//! next one. Replies of one message are printed together.

use super::{Bot, Command, START_TEXT, SEARCHING_TEXT, parse_message};
use anyhow::Context;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

pub async fn run(bot: Bot, part_delay: Duration) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<Vec<String>>(32);

    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(replies) = rx.recv().await {
            for (i, reply) in replies.iter().enumerate() {
                if i > 0 {
                    tokio::time::sleep(part_delay).await;
                }
                stdout.write_all(reply.as_bytes()).await?;
                stdout.write_all(b"\n\n").await?;
                stdout.flush().await?;
            }
        }
        anyhow::Ok(())
    });

    tx.send(vec![START_TEXT.to_string()])
        .await
        .context("printer closed")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        if matches!(parse_message(&line), Some(Command::Search(_))) {
            tx.send(vec![SEARCHING_TEXT.to_string()])
                .await
                .context("printer closed")?;
        }

        let bot = bot.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let replies = bot.handle(&line).await;
            if tx.send(replies).await.is_err() {
                debug!("printer gone, dropping replies");
            }
        });
    }

    // Pending lookups keep their senders alive, so the printer drains them first.
    drop(tx);
    printer.await.context("join printer")??;
    Ok(())
}
