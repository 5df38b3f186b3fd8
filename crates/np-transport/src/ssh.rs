//! SSH implementation of the device channel.
//!
//! Switch CLIs are interactive: configuration mode spans commands, output
//! is paginated, and completion is signalled by the prompt reappearing.
//! So one shell channel is opened per connection, pagination is disabled
//! with `terminal length 0`, and `run` reads until the prompt regex
//! (`[>#]\s*$`) matches the buffer tail, answering `--More--` with a space.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use russh::client::{self, Handle, Msg};
use russh::{Channel, ChannelMsg, Disconnect};
use russh_keys::key;
use tokio::time::Instant;

use np_protocol::{DeviceTarget, Reachability};

use crate::error::{TransportError, TransportResult};
use crate::{DeviceChannel, DeviceTransport};

/// Time allowed for the TCP/SSH handshake and authentication.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Time allowed for the login banner and the pagination-off command.
const SETUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Pagination continuation marker emitted by the switch.
const MORE_MARKER: &str = "--More--";

/// Accepts any host key. Switch inventories carry addresses, not pinned
/// keys; key verification is out of scope for the management network.
struct AcceptingHandler;

#[async_trait]
impl client::Handler for AcceptingHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &key::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Opens one SSH shell channel per `connect` call.
pub struct SshTransport;

impl SshTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SshTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceTransport for SshTransport {
    async fn connect(&self, target: &mut DeviceTarget) -> TransportResult<Box<dyn DeviceChannel>> {
        match SshChannel::open(target).await {
            Ok(channel) => {
                target.reachability = Reachability::Reachable;
                tracing::info!(target = %target.hostname, "ssh channel open");
                Ok(Box::new(channel))
            }
            Err(e) => {
                target.reachability = Reachability::Unreachable;
                tracing::warn!(target = %target.hostname, error = %e, "ssh connect failed");
                Err(e)
            }
        }
    }
}

/// One interactive shell channel to a switch.
pub struct SshChannel {
    handle: Handle<AcceptingHandler>,
    channel: Option<Channel<Msg>>,
    prompt: Regex,
}

impl SshChannel {
    async fn open(target: &DeviceTarget) -> TransportResult<Self> {
        let config = Arc::new(client::Config {
            inactivity_timeout: Some(Duration::from_secs(60)),
            ..Default::default()
        });

        let addr = (target.address.as_str(), target.ssh_port);
        let mut handle = tokio::time::timeout(
            CONNECT_TIMEOUT,
            client::connect(config, addr, AcceptingHandler),
        )
        .await
        .map_err(|_| TransportError::Timeout(CONNECT_TIMEOUT.as_secs()))?
        .map_err(|e| TransportError::Connection(e.to_string()))?;

        let authenticated = handle
            .authenticate_password(&target.username, &target.password)
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        if !authenticated {
            return Err(TransportError::Auth(format!(
                "password rejected for {}@{}",
                target.username, target.address
            )));
        }

        let channel = handle
            .channel_open_session()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        channel
            .request_pty(true, "vt100", 200, 0, 0, 0, &[])
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        channel
            .request_shell(true)
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let mut session = Self {
            handle,
            channel: Some(channel),
            prompt: Regex::new(r"[>#]\s*$").expect("prompt regex"),
        };

        // Drain the login banner, then turn pagination off for the whole
        // session.
        let _ = session.read_until_prompt(SETUP_TIMEOUT).await;
        session.send_line("terminal length 0").await?;
        let _ = session.read_until_prompt(SETUP_TIMEOUT).await?;

        Ok(session)
    }

    async fn send_line(&mut self, line: &str) -> TransportResult<()> {
        let channel = self.channel.as_mut().ok_or(TransportError::ChannelClosed)?;
        let payload = format!("{line}\n");
        channel
            .data(payload.as_bytes())
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }

    /// Accumulate output until the prompt reappears or `timeout` elapses.
    async fn read_until_prompt(&mut self, timeout: Duration) -> TransportResult<String> {
        let deadline = Instant::now() + timeout;
        let mut buffer = String::new();

        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .ok_or(TransportError::Timeout(timeout.as_secs()))?;

            let channel = self.channel.as_mut().ok_or(TransportError::ChannelClosed)?;
            let msg = tokio::time::timeout(remaining, channel.wait())
                .await
                .map_err(|_| TransportError::Timeout(timeout.as_secs()))?;

            match msg {
                Some(ChannelMsg::Data { ref data })
                | Some(ChannelMsg::ExtendedData { ref data, .. }) => {
                    buffer.push_str(&String::from_utf8_lossy(data));

                    if buffer.trim_end_matches([' ', '\t']).ends_with(MORE_MARKER) {
                        // Spacebar advances the pager.
                        self.send_raw(b" ").await?;
                        continue;
                    }
                    if self.prompt.is_match(buffer.trim_end_matches(['\r', ' '])) {
                        return Ok(buffer);
                    }
                }
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(TransportError::ChannelClosed);
                }
                Some(_) => {}
            }
        }
    }

    async fn send_raw(&mut self, bytes: &[u8]) -> TransportResult<()> {
        let channel = self.channel.as_mut().ok_or(TransportError::ChannelClosed)?;
        channel
            .data(bytes)
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }
}

#[async_trait]
impl DeviceChannel for SshChannel {
    async fn run(&mut self, command: &str, timeout: Duration) -> TransportResult<String> {
        self.send_line(command).await?;
        let raw = self.read_until_prompt(timeout).await?;
        Ok(clean_output(&raw, command))
    }

    async fn close(&mut self) -> TransportResult<()> {
        if let Some(channel) = self.channel.take() {
            let _ = channel.eof().await;
            self.handle
                .disconnect(Disconnect::ByApplication, "", "en")
                .await
                .map_err(|e| TransportError::Io(e.to_string()))?;
        }
        Ok(())
    }
}

/// Strip the command echo, pagination markers and the trailing prompt line
/// from raw shell output.
fn clean_output(raw: &str, command: &str) -> String {
    let without_more = raw.replace(MORE_MARKER, "");
    let mut lines: Vec<&str> = without_more.lines().collect();

    // Final line is the returned prompt.
    if lines
        .last()
        .is_some_and(|l| l.trim_end().ends_with('#') || l.trim_end().ends_with('>'))
    {
        lines.pop();
    }
    // First line echoes the command we just sent.
    if lines.first().is_some_and(|l| l.trim().ends_with(command.trim())) {
        lines.remove(0);
    }

    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_echo_and_prompt() {
        let raw = "show vlan brief\r\nVLAN Name   Status\r\n100  USERS  active\r\nswitch# ";
        let cleaned = clean_output(raw, "show vlan brief");
        assert_eq!(cleaned, "VLAN Name   Status\n100  USERS  active");
    }

    #[test]
    fn clean_removes_pagination_markers() {
        let raw = "show interface\r\nline one\r\n--More--line two\r\nswitch# ";
        let cleaned = clean_output(raw, "show interface");
        assert!(!cleaned.contains("--More--"));
        assert!(cleaned.contains("line two"));
    }

    #[test]
    fn clean_keeps_output_without_prompt() {
        let raw = "partial output with no prompt";
        assert_eq!(clean_output(raw, "show x"), "partial output with no prompt");
    }

    #[test]
    fn prompt_regex_matches_exec_and_config_prompts() {
        let prompt = Regex::new(r"[>#]\s*$").unwrap();
        assert!(prompt.is_match("switch#"));
        assert!(prompt.is_match("switch# "));
        assert!(prompt.is_match("switch(config)# "));
        assert!(prompt.is_match("switch>"));
        assert!(!prompt.is_match("Ethernet1/1 is up"));
    }
}
