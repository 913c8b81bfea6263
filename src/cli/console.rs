use crate::core::{Confirm, Error, Result, Staged};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

const RULE: &str = "-----------------------------------------";

/// Line-oriented operator input. Output goes straight to stdout.
pub struct Console<R> {
    reader: R,
}

impl Console<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> Console<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Next line without its terminator, or `None` at end of input.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(Error::Console)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> Confirm for Console<R> {
    async fn confirm(&mut self, staged: &Staged) -> Result<bool> {
        println!("{}", RULE);
        println!("{}", staged);
        println!();
        println!("{}", staged.question());
        println!("{}", RULE);

        let answer = self.read_line().await?.unwrap_or_default();
        Ok(is_yes(&answer))
    }
}

pub fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(input: &[u8]) -> Console<BufReader<tokio_test::io::Mock>> {
        Console::new(BufReader::new(
            tokio_test::io::Builder::new().read(input).build(),
        ))
    }

    #[test]
    fn test_is_yes() {
        for answer in ["y", "Y", "yes", " YES \r"] {
            assert!(is_yes(answer), "{answer:?}");
        }
        for answer in ["", "n", "no", "yep", "y y"] {
            assert!(!is_yes(answer), "{answer:?}");
        }
    }

    #[tokio::test]
    async fn test_read_line_strips_terminators() {
        let mut console = scripted(b"creator foo\r\nstop\n");
        assert_eq!(console.read_line().await.unwrap().as_deref(), Some("creator foo"));
        assert_eq!(console.read_line().await.unwrap().as_deref(), Some("stop"));
        assert_eq!(console.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_confirm_reads_one_answer() {
        let mut console = scripted(b"y\nn\n");
        let staged = Staged::Video {
            title: "t".to_string(),
        };
        assert!(console.confirm(&staged).await.unwrap());
        assert!(!console.confirm(&staged).await.unwrap());
        // End of input declines.
        assert!(!console.confirm(&staged).await.unwrap());
    }
}
