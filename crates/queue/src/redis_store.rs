//! Redis-backed queue store.
//!
//! Each queue is a Redis list at `{key_prefix}{queue_name}`; members are
//! pushed with `RPUSH` so index 0 is the longest-waiting member. Joins and
//! their reverts run as Lua scripts, which Redis executes atomically, so the
//! length check and the push or drain cannot interleave with another join.

use {
    async_trait::async_trait,
    redis::{AsyncCommands, Script, aio::ConnectionManager},
    secrecy::ExposeSecret,
    tracing::{debug, info},
};

use study_together_config::RedisConfig;

use crate::{
    error::{Error, Result},
    store::{JoinOutcome, QueueStore},
};

/// `KEYS[1]` = list key, `ARGV[1]` = member, `ARGV[2]` = capacity.
///
/// Replies `{"formed", m1, m2, ...}` or `{"queued", new_length}`.
const JOIN_SCRIPT: &str = r"
local len = redis.call('LLEN', KEYS[1])
if len + 1 >= tonumber(ARGV[2]) then
  local members = redis.call('LRANGE', KEYS[1], 0, -1)
  redis.call('DEL', KEYS[1])
  table.insert(members, 1, 'formed')
  return members
end
local filled = redis.call('RPUSH', KEYS[1], ARGV[1])
return {'queued', tostring(filled)}
";

/// `KEYS[1]` = list key, `ARGV[1]` = `queued` or `formed`.
///
/// `queued`: `ARGV[2]` is the member; its last occurrence is removed.
/// `formed`: `ARGV[2..]` are the drained members, pushed back to the front
/// in their stored order.
const REVERT_SCRIPT: &str = r"
if ARGV[1] == 'queued' then
  return redis.call('LREM', KEYS[1], -1, ARGV[2])
end
for i = #ARGV, 2, -1 do
  redis.call('LPUSH', KEYS[1], ARGV[i])
end
return #ARGV - 1
";

/// Queue store backed by Redis lists.
#[derive(Clone)]
pub struct RedisQueueStore {
    /// Connection manager (reconnects automatically).
    redis: ConnectionManager,
    key_prefix: String,
    join_script: Script,
    revert_script: Script,
}

impl RedisQueueStore {
    /// Connect using the configured host, port, password and database.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(connection_url(config).as_str())?;
        let redis = ConnectionManager::new(client).await?;
        info!(
            host = %config.host,
            port = config.port,
            db = config.db,
            "connected to redis"
        );
        Ok(Self::from_connection(redis, &config.key_prefix))
    }

    /// Wrap an existing connection manager.
    pub fn from_connection(redis: ConnectionManager, key_prefix: &str) -> Self {
        Self {
            redis,
            key_prefix: key_prefix.to_string(),
            join_script: Script::new(JOIN_SCRIPT),
            revert_script: Script::new(REVERT_SCRIPT),
        }
    }

    /// Round-trip a `PING` to confirm the server is reachable.
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.redis.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        debug!(reply = %pong, "redis ping");
        Ok(())
    }

    fn key(&self, queue: &str) -> String {
        format!("{}{queue}", self.key_prefix)
    }
}

#[async_trait]
impl QueueStore for RedisQueueStore {
    async fn length(&self, queue: &str) -> Result<usize> {
        let mut conn = self.redis.clone();
        let len: usize = conn.llen(self.key(queue)).await?;
        Ok(len)
    }

    async fn append(&self, queue: &str, member: &str) -> Result<usize> {
        let mut conn = self.redis.clone();
        let len: usize = conn.rpush(self.key(queue), member).await?;
        Ok(len)
    }

    async fn drain_all(&self, queue: &str) -> Result<Vec<String>> {
        let key = self.key(queue);
        let mut conn = self.redis.clone();

        let mut pipe = redis::pipe();
        pipe.atomic().lrange(&key, 0, -1).del(&key).ignore();
        let (members,): (Vec<String>,) = pipe.query_async(&mut conn).await?;
        Ok(members)
    }

    async fn join(&self, queue: &str, member: &str, capacity: usize) -> Result<JoinOutcome> {
        let mut conn = self.redis.clone();

        let mut invocation = self.join_script.key(self.key(queue));
        invocation.arg(member).arg(capacity);
        let reply: Vec<String> = invocation.invoke_async(&mut conn).await?;

        parse_join_reply(queue, reply)
    }

    async fn revert_join(&self, queue: &str, member: &str, outcome: &JoinOutcome) -> Result<()> {
        let mut conn = self.redis.clone();

        let mut invocation = self.revert_script.key(self.key(queue));
        match outcome {
            JoinOutcome::Queued { .. } => {
                invocation.arg("queued").arg(member);
            },
            JoinOutcome::Formed { members } => {
                invocation.arg("formed");
                for m in members {
                    invocation.arg(m);
                }
            },
        }
        let touched: usize = invocation.invoke_async(&mut conn).await?;
        debug!(queue, touched, "join reverted");
        Ok(())
    }
}

fn parse_join_reply(queue: &str, mut reply: Vec<String>) -> Result<JoinOutcome> {
    if reply.is_empty() {
        return Err(Error::unexpected_reply(queue, "empty reply"));
    }
    let tag = reply.remove(0);
    match tag.as_str() {
        "formed" => Ok(JoinOutcome::Formed { members: reply }),
        "queued" => {
            let filled = reply
                .first()
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| Error::unexpected_reply(queue, format!("bad length {reply:?}")))?;
            Ok(JoinOutcome::Queued { filled })
        },
        other => Err(Error::unexpected_reply(
            queue,
            format!("unknown tag \"{other}\""),
        )),
    }
}

/// Build the `redis://` URL for `config`. The password is percent-encoded.
fn connection_url(config: &RedisConfig) -> String {
    let auth = match &config.password {
        Some(password) if !password.expose_secret().is_empty() => {
            format!(":{}@", urlencoding::encode(password.expose_secret()))
        },
        _ => String::new(),
    };
    format!(
        "redis://{auth}{}:{}/{}",
        config.host, config.port, config.db
    )
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest, secrecy::Secret};

    #[test]
    fn url_without_password() {
        let cfg = RedisConfig::default();
        assert_eq!(connection_url(&cfg), "redis://localhost:6379/0");
    }

    #[test]
    fn url_with_password_is_encoded() {
        let cfg = RedisConfig {
            host: "cache".into(),
            port: 6380,
            password: Some(Secret::new("p@ss/word".into())),
            db: 1,
            key_prefix: String::new(),
        };
        assert_eq!(connection_url(&cfg), "redis://:p%40ss%2Fword@cache:6380/1");
    }

    #[test]
    fn empty_password_is_omitted() {
        let cfg = RedisConfig {
            password: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert_eq!(connection_url(&cfg), "redis://localhost:6379/0");
    }

    #[test]
    fn formed_reply() {
        let reply = vec!["formed".into(), "<@1>".into(), "<@2>".into()];
        assert_eq!(
            parse_join_reply("3-cam", reply).unwrap(),
            JoinOutcome::Formed {
                members: vec!["<@1>".into(), "<@2>".into()]
            }
        );
    }

    #[test]
    fn queued_reply() {
        let reply = vec!["queued".into(), "2".into()];
        assert_eq!(
            parse_join_reply("3-cam", reply).unwrap(),
            JoinOutcome::Queued { filled: 2 }
        );
    }

    #[rstest]
    #[case::empty(vec![])]
    #[case::missing_length(vec!["queued".into()])]
    #[case::bad_length(vec!["queued".into(), "two".into()])]
    #[case::unknown_tag(vec!["maybe".into()])]
    fn malformed_replies_are_errors(#[case] reply: Vec<String>) {
        assert!(matches!(
            parse_join_reply("2-cam", reply),
            Err(Error::UnexpectedReply { .. })
        ));
    }
}
