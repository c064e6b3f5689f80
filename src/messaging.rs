/*!
 * Mail pipeline for tests and replies.
 *
 * A test is a plain-text message listing the words the user gets wrong
 * most often. Replies are run through an external parse script which
 * prints alternating question and answer lines; every pair updates the
 * answer counts of the question word.
 */

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::process::Stdio;

use log::{debug, info, warn};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::process::Command;

use crate::app_config::MessagingConfig;
use crate::database::Store;
use crate::errors::{MemoError, Result};
use crate::word::{find_by_value, words_to_test};

/// A prepared test, ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    recipient: String,
    subject: String,
    questions: Vec<String>,
}

impl Quiz {
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Words to be translated, worst answered first
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Format the test as a complete mail message
    pub fn render(&self) -> String {
        let mut message = format!(
            "To: {}\nSubject: {}\nContent-Type: text/plain; charset=UTF-8\n\n",
            self.recipient, self.subject
        );
        for question in &self.questions {
            message.push_str(&format!("  {} = \n", question));
        }
        message
    }
}

/// A question and the answer given to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerPair {
    pub question: String,
    pub answer: String,
}

/// Outcome of processing a reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplyReport {
    /// Questions answered with a known translation
    pub correct: usize,
    /// Questions answered with anything else
    pub wrong: usize,
    /// Questions which aren't words of the store
    pub unknown: usize,
}

impl fmt::Display for ReplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Correct: {}, Wrong: {}, Unknown questions: {}",
            self.correct, self.wrong, self.unknown
        )
    }
}

/// Pick up to `count` words for a test addressed to `recipient`
pub fn prepare_test(store: &Store, count: usize, recipient: &str, subject: &str) -> Result<Quiz> {
    let questions = words_to_test(store, count)?
        .iter_mut()
        .map(|word| word.value().map(str::to_string))
        .collect::<Result<Vec<_>>>()?;

    Ok(Quiz {
        recipient: recipient.to_string(),
        subject: subject.to_string(),
        questions,
    })
}

/// Prepare a test and hand it to the configured send command
pub async fn send_test(
    store: &Store,
    config: &MessagingConfig,
    count: usize,
    recipient: &str,
) -> Result<Quiz> {
    let quiz = prepare_test(store, count, recipient, &config.subject)?;
    if quiz.is_empty() {
        return Err(MemoError::Messaging("there are no words to test".to_string()));
    }

    let message = quiz.render();
    run_filter(&config.send_command, &config.send_args, message.as_bytes()).await?;

    info!("Sent a test of {} words to {}", quiz.questions().len(), recipient);
    Ok(quiz)
}

/// Split parse script output into question/answer pairs.
///
/// Lines alternate between a question and its answer; an unpaired last
/// line is ignored.
pub fn parse_answer_pairs(text: &str) -> Vec<AnswerPair> {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    lines
        .chunks_exact(2)
        .map(|pair| AnswerPair {
            question: pair[0].to_string(),
            answer: pair[1].to_string(),
        })
        .collect()
}

/// Record the given answers in the store
pub fn apply_answers(store: &Store, pairs: &[AnswerPair]) -> Result<ReplyReport> {
    let mut report = ReplyReport::default();

    for pair in pairs {
        let Some(mut question) = find_by_value(store, &pair.question)? else {
            warn!("Ignoring answer to unknown question '{}'", pair.question);
            report.unknown += 1;
            continue;
        };
        let answer = find_by_value(store, &pair.answer)?;

        let correct = answer
            .as_ref()
            .is_some_and(|answer| question.check_translation(answer));
        if correct {
            question.inc_positive_answers()?;
            report.correct += 1;
        } else {
            debug!("'{}' is not a translation of '{}'", pair.answer, pair.question);
            question.inc_negative_answers()?;
            report.wrong += 1;
        }
        question.update()?;
    }

    Ok(report)
}

/// Run a reply through the parse script and record the answers it contains
pub async fn check_reply<R>(store: &Store, reply: R, script: &Path) -> Result<ReplyReport>
where
    R: AsyncRead + Unpin,
{
    let parsed = run_filter(script, &[], reply).await?;
    let text = String::from_utf8(parsed).map_err(|e| {
        MemoError::Messaging(format!("reply parse script printed invalid UTF-8: {}", e))
    })?;
    let pairs = parse_answer_pairs(&text);

    let report = apply_answers(store, &pairs)?;
    info!("Processed reply: {}", report);
    Ok(report)
}

/// Feed `input` to a program's stdin and collect its stdout
async fn run_filter<P, R>(program: P, args: &[String], mut input: R) -> Result<Vec<u8>>
where
    P: AsRef<OsStr>,
    R: AsyncRead + Unpin,
{
    let name = program.as_ref().to_string_lossy().into_owned();
    debug!("Running {} {:?}", name, args);

    let mut child = Command::new(program.as_ref())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| MemoError::Messaging(format!("failed to start {}: {}", name, e)))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| MemoError::Messaging(format!("no stdin for {}", name)))?;

    let feed = async move {
        tokio::io::copy(&mut input, &mut stdin).await?;
        stdin.shutdown().await
    };
    let (fed, output) = tokio::join!(feed, child.wait_with_output());

    let output = output?;
    if !output.status.success() {
        return Err(MemoError::Messaging(format!(
            "{} exited with {}",
            name, output.status
        )));
    }
    fed?;

    Ok(output.stdout)
}
