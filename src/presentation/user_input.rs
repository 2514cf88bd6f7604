// Line-based user input: node names are clicks, `drag`/`release` move nodes
use crate::application::dispatcher::UserInput;
use crate::application::view_model::Point;
use futures::stream::Stream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;

pub fn stdin_input() -> impl Stream<Item = UserInput> {
    user_input(BufReader::new(tokio::io::stdin()))
}

pub fn user_input<R>(reader: R) -> impl Stream<Item = UserInput>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = LinesStream::new(reader.lines());
    async_stream::stream! {
        while let Some(line) = lines.next().await {
            match line {
                Ok(line) => {
                    if let Some(input) = parse_line(&line) {
                        yield input;
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to read user input: {}", e);
                    break;
                }
            }
        }
    }
}

fn parse_line(line: &str) -> Option<UserInput> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let mut words = line.split_whitespace();
    match (words.next(), words.next()) {
        (Some("drag"), Some(name)) => {
            let x = words.next().and_then(|w| w.parse().ok());
            let y = words.next().and_then(|w| w.parse().ok());
            match (x, y) {
                (Some(x), Some(y)) => Some(UserInput::Drag {
                    name: name.to_string(),
                    to: Point::new(x, y),
                }),
                _ => {
                    tracing::warn!("Ignoring drag without coordinates: {}", line);
                    None
                }
            }
        }
        (Some("release"), Some(name)) => Some(UserInput::Release(name.to_string())),
        _ => Some(UserInput::Click(line.to_string())),
    }
}
