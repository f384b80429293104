//! Client ServerQuery TeamSpeak 3 (TCP, port 10011 par défaut).
//!
//! Le client est strictement séquentiel : une commande est écrite puis ses
//! lignes sont lues jusqu'à `error id=..`. Les notifications de messages
//! reçues pendant une commande sont mises en file et rendues par
//! `wait_for_event`.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::errors::{NICKNAME_IN_USE, QueryError, Result};
use crate::event::{ChannelId, ChatEvent, ClientPosition, Scope};
use crate::protocol::{Record, build_command, parse_error_line, parse_records, split_notification};
use crate::source::EventSource;

const GREETING_LINES: usize = 2;
const TEXT_MESSAGE_NOTIFY: &str = "notifytextmessage";

/// Paramètres de connexion ServerQuery
#[derive(Clone, Debug)]
pub struct QueryConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub nickname: String,
    pub server_id: u32,
    /// Délai maximal d'une commande
    pub timeout: Duration,
}

#[derive(Debug)]
struct Connection {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    // octets d'une ligne pas encore terminée
    partial: Vec<u8>,
}

impl Connection {
    fn open(config: &QueryConfig) -> Result<Self> {
        let addr = (config.host.as_str(), config.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| QueryError::protocol(format!("cannot resolve {}", config.host)))?;
        let stream = TcpStream::connect_timeout(&addr, config.timeout)?;
        stream.set_nodelay(true)?;
        stream.set_write_timeout(Some(config.timeout))?;
        let writer = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
            partial: Vec::new(),
        })
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        trace!(line = %line, "ServerQuery >");
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Lit une ligne complète non vide avant `deadline`.
    ///
    /// `Ok(None)` signifie que le délai a expiré ; les octets déjà reçus
    /// sont conservés pour l'appel suivant.
    fn read_line(&mut self, deadline: Instant) -> Result<Option<String>> {
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            let remaining = (deadline - now).max(Duration::from_millis(1));
            self.reader.get_ref().set_read_timeout(Some(remaining))?;

            match self.reader.read_until(b'\n', &mut self.partial) {
                Ok(0) => return Err(QueryError::Disconnected),
                Ok(_) => {
                    if self.partial.last() != Some(&b'\n') {
                        continue;
                    }
                    let raw = std::mem::take(&mut self.partial);
                    let line = String::from_utf8_lossy(&raw)
                        .trim_matches(|c| c == '\r' || c == '\n')
                        .to_string();
                    if line.is_empty() {
                        continue;
                    }
                    trace!(line = %line, "ServerQuery <");
                    return Ok(Some(line));
                }
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    continue;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn close(&mut self) {
        let _ = self.writer.shutdown(Shutdown::Both);
    }
}

/// Source d'évènements parlant le protocole ServerQuery
#[derive(Debug)]
pub struct ServerQueryClient {
    config: QueryConfig,
    conn: Option<Connection>,
    pending: VecDeque<ChatEvent>,
}

impl ServerQueryClient {
    pub fn new(config: QueryConfig) -> Self {
        Self {
            config,
            conn: None,
            pending: VecDeque::new(),
        }
    }

    fn conn(&mut self) -> Result<&mut Connection> {
        self.conn.as_mut().ok_or(QueryError::NotConnected)
    }

    /// Oublie la connexion si l'erreur indique qu'elle est perdue
    fn check<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_connection_lost() {
                warn!(error = %e, "ServerQuery connection dropped");
                if let Some(mut conn) = self.conn.take() {
                    conn.close();
                }
            }
        }
        result
    }

    fn queue_notification(&mut self, line: &str) {
        match split_notification(line) {
            Some((TEXT_MESSAGE_NOTIFY, record)) => match ChatEvent::from_record(&record) {
                Some(event) => self.pending.push_back(event),
                None => debug!(line = %line, "Text message without invoker ignored"),
            },
            Some((name, _)) => trace!(notification = %name, "Notification ignored"),
            None => {}
        }
    }

    fn execute_inner(&mut self, command: &str) -> Result<Vec<Record>> {
        let deadline = Instant::now() + self.config.timeout;
        self.conn()?.write_line(command)?;

        let mut records = Vec::new();
        loop {
            let line = match self.conn()?.read_line(deadline)? {
                Some(line) => line,
                None => {
                    return Err(QueryError::Timeout {
                        command: command_name(command),
                    });
                }
            };

            if line.starts_with("notify") {
                self.queue_notification(&line);
                continue;
            }
            if let Some((id, msg)) = parse_error_line(&line) {
                if id == 0 {
                    return Ok(records);
                }
                return Err(QueryError::Command {
                    command: command_name(command),
                    id,
                    msg,
                });
            }
            records.extend(parse_records(&line));
        }
    }

    /// Exécute une commande et renvoie ses enregistrements
    pub fn execute(&mut self, name: &str, params: &[(&str, &str)]) -> Result<Vec<Record>> {
        let command = build_command(name, params);
        let result = self.execute_inner(&command);
        self.check(result)
    }

    fn first_record(&mut self, name: &str, params: &[(&str, &str)]) -> Result<Record> {
        self.execute(name, params)?
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::protocol(format!("{} returned no data", name)))
    }

    fn read_greeting(&mut self) -> Result<()> {
        let deadline = Instant::now() + self.config.timeout;
        for _ in 0..GREETING_LINES {
            match self.conn()?.read_line(deadline)? {
                Some(line) => trace!(line = %line, "ServerQuery greeting"),
                None => return Err(QueryError::protocol("no ServerQuery greeting")),
            }
        }
        Ok(())
    }

    fn handshake(&mut self) -> Result<()> {
        self.read_greeting()?;

        let (username, password) = (self.config.username.clone(), self.config.password.clone());
        self.execute(
            "login",
            &[
                ("client_login_name", &username),
                ("client_login_password", &password),
            ],
        )?;

        let sid = self.config.server_id.to_string();
        self.execute("use", &[("sid", &sid)])?;

        let nickname = self.config.nickname.clone();
        match self.execute("clientupdate", &[("client_nickname", &nickname)]) {
            Err(QueryError::Command { id, msg, .. }) if id == NICKNAME_IN_USE => {
                warn!(nickname = %nickname, reason = %msg, "Nickname not applied");
            }
            other => {
                other?;
            }
        }

        self.execute("servernotifyregister", &[("event", "textserver")])?;
        self.execute("servernotifyregister", &[("event", "textchannel")])?;
        Ok(())
    }
}

fn command_name(command: &str) -> String {
    command.split(' ').next().unwrap_or(command).to_string()
}

impl EventSource for ServerQueryClient {
    fn connect(&mut self) -> Result<()> {
        if let Some(mut old) = self.conn.take() {
            old.close();
        }
        info!(host = %self.config.host, port = self.config.port, "Server query connecting...");
        self.conn = Some(Connection::open(&self.config)?);
        let result = self.handshake();
        if result.is_err() {
            if let Some(mut conn) = self.conn.take() {
                conn.close();
            }
        }
        result?;
        info!(sid = self.config.server_id, "Server query connected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn heartbeat(&mut self) -> Result<()> {
        self.execute("version", &[]).map(|_| ())
    }

    fn wait_for_event(&mut self, timeout: Duration) -> Result<Option<ChatEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }
        let deadline = Instant::now() + timeout;
        loop {
            let read = self.conn().and_then(|conn| conn.read_line(deadline));
            let line = match self.check(read)? {
                Some(line) => line,
                None => return Ok(None),
            };
            self.queue_notification(&line);
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }
        }
    }

    fn send(&mut self, scope: Scope, text: &str) -> Result<()> {
        let target = match scope {
            Scope::Server => self.config.server_id as u64,
            Scope::Channel => self.own_position()?.channel_id,
        };
        let mode = scope.target_mode().to_string();
        let target = target.to_string();
        self.execute(
            "sendtextmessage",
            &[("targetmode", &mode), ("target", &target), ("msg", text)],
        )
        .map(|_| ())
    }

    fn broadcast(&mut self, text: &str) -> Result<()> {
        self.execute("gm", &[("msg", text)]).map(|_| ())
    }

    fn own_position(&mut self) -> Result<ClientPosition> {
        let record = self.first_record("whoami", &[])?;
        let field = |name: &str| -> Result<u64> {
            record
                .get(name)
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| QueryError::protocol(format!("whoami without {}", name)))
        };
        Ok(ClientPosition {
            client_id: field("client_id")?,
            channel_id: field("client_channel_id")?,
        })
    }

    fn move_to_channel(&mut self, channel: ChannelId) -> Result<()> {
        let me = self.own_position()?;
        if me.channel_id == channel {
            return Ok(());
        }
        let (cid, clid) = (channel.to_string(), me.client_id.to_string());
        self.execute("clientmove", &[("cid", &cid), ("clid", &clid)])?;
        info!(cid = channel, "Client moved");
        Ok(())
    }

    fn is_online(&mut self, uid: &str) -> Result<bool> {
        match self.execute("clientgetids", &[("cluid", uid)]) {
            Ok(records) => Ok(records.iter().any(|r| r.contains_key("clid"))),
            Err(e) if e.is_empty_result() => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn resolve_identity(&mut self, uid: &str) -> Result<Option<String>> {
        match self.execute("clientgetnamefromuid", &[("cluid", uid)]) {
            Ok(records) => Ok(records.into_iter().find_map(|mut r| r.remove("name"))),
            Err(e) if e.is_empty_result() => Ok(None),
            Err(QueryError::Command { id: 512, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Drop for ServerQueryClient {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.as_mut() {
            let _ = conn.write_line("quit");
            conn.close();
        }
    }
}
