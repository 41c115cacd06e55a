//! Redis-backed search index.
//!
//! Layout, per entity (`{base}` is `{prefix}{entity}`):
//!
//! ```text
//! {base}:doc:{id}     JSON document
//! {base}:ids          SET of indexed ids
//! {base}:term:{t}     SET of ids whose document contains token t
//! {base}:terms:{id}   SET of tokens of one document
//! {base}:vocab        ZSET (score 0) of every token, for prefix lookup
//! ```
//!
//! Writes to one document run as a Lua script, so reading the document's
//! previous tokens and replacing them is a single atomic step. A token whose
//! term set becomes empty is removed from the vocabulary.

use std::collections::HashSet;
use std::marker::PhantomData;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};
use tracing::{debug, instrument};

use super::analyzer::{document_tokens, Query, Term};
use crate::domain::{sort_entities, Entity, SearchIndex};
use crate::shared::error::IndexError;
use crate::shared::pagination::{Page, PageRequest};

/// Key names of one entity's index.
#[derive(Debug, Clone)]
struct IndexKeys {
    base: String,
}

impl IndexKeys {
    fn new(prefix: &str, entity: &str) -> Self {
        Self {
            base: format!("{prefix}{}", entity.to_lowercase()),
        }
    }

    fn doc(&self, id: i64) -> String {
        format!("{}:doc:{id}", self.base)
    }

    fn ids(&self) -> String {
        format!("{}:ids", self.base)
    }

    fn term(&self, token: &str) -> String {
        format!("{}:term:{token}", self.base)
    }

    fn terms(&self, id: i64) -> String {
        format!("{}:terms:{id}", self.base)
    }

    fn vocab(&self) -> String {
        format!("{}:vocab", self.base)
    }

    /// Script call with the per-document keys and the `base, id` arguments.
    fn invocation<'a>(&self, script: &'a Script, id: i64) -> redis::ScriptInvocation<'a> {
        let mut call = script.prepare_invoke();
        call.key(self.doc(id))
            .key(self.ids())
            .key(self.terms(id))
            .key(self.vocab())
            .arg(&self.base)
            .arg(id);
        call
    }
}

/// Drop a document's tokens from the term sets and the vocabulary.
///
/// KEYS: doc, ids, terms:{id}, vocab. ARGV: base, id.
const UNINDEX_TOKENS: &str = r#"
local base, id = ARGV[1], ARGV[2]
for _, token in ipairs(redis.call('SMEMBERS', KEYS[3])) do
    local term = base .. ':term:' .. token
    redis.call('SREM', term, id)
    if redis.call('SCARD', term) == 0 then
        redis.call('ZREM', KEYS[4], token)
    end
end
redis.call('DEL', KEYS[3])
"#;

/// ARGV: base, id, json, tokens...
static INDEX_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(&format!(
        r#"{UNINDEX_TOKENS}
redis.call('SET', KEYS[1], ARGV[3])
redis.call('SADD', KEYS[2], id)
for i = 4, #ARGV do
    local token = ARGV[i]
    redis.call('SADD', base .. ':term:' .. token, id)
    redis.call('SADD', KEYS[3], token)
    redis.call('ZADD', KEYS[4], 0, token)
end
return 1
"#
    ))
});

/// ARGV: base, id
static DELETE_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(&format!(
        r#"{UNINDEX_TOKENS}
redis.call('DEL', KEYS[1])
redis.call('SREM', KEYS[2], id)
return 1
"#
    ))
});

/// Lexicographic range covering every token that starts with `prefix`.
fn prefix_range(prefix: &str) -> (Vec<u8>, Vec<u8>) {
    let mut min = b"[".to_vec();
    min.extend_from_slice(prefix.as_bytes());
    let mut max = min.clone();
    max.push(0xff);
    (min, max)
}

/// Search index kept in Redis sets.
pub struct RedisSearchIndex<E: Entity> {
    conn: ConnectionManager,
    keys: IndexKeys,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> RedisSearchIndex<E> {
    pub fn new(conn: ConnectionManager, key_prefix: &str) -> Self {
        Self {
            conn,
            keys: IndexKeys::new(key_prefix, E::NAME),
            _entity: PhantomData,
        }
    }

    /// Ids of documents containing a token matching `term`.
    async fn ids_for_term(
        &self,
        conn: &mut ConnectionManager,
        term: &Term,
    ) -> Result<HashSet<i64>, IndexError> {
        match term {
            Term::Exact(token) => Ok(conn.smembers(self.keys.term(token)).await?),
            Term::Prefix(prefix) => {
                let (min, max) = prefix_range(prefix);
                let tokens: Vec<String> = conn.zrangebylex(self.keys.vocab(), min, max).await?;
                if tokens.is_empty() {
                    return Ok(HashSet::new());
                }
                let keys: Vec<String> = tokens.iter().map(|t| self.keys.term(t)).collect();
                Ok(conn.sunion(keys).await?)
            }
        }
    }

    async fn matching_ids(&self, conn: &mut ConnectionManager, query: &str) -> Result<Vec<i64>, IndexError> {
        let mut ids: HashSet<i64> = match Query::parse(query) {
            Query::All => conn.smembers(self.keys.ids()).await?,
            Query::Terms(terms) => {
                let mut acc: Option<HashSet<i64>> = None;
                for term in &terms {
                    let hits = self.ids_for_term(conn, term).await?;
                    let narrowed = match acc {
                        None => hits,
                        Some(prev) => prev.intersection(&hits).copied().collect(),
                    };
                    if narrowed.is_empty() {
                        return Ok(Vec::new());
                    }
                    acc = Some(narrowed);
                }
                acc.unwrap_or_default()
            }
        };

        let mut sorted: Vec<i64> = ids.drain().collect();
        sorted.sort_unstable();
        Ok(sorted)
    }

    async fn load(&self, conn: &mut ConnectionManager, ids: &[i64]) -> Result<Vec<E>, IndexError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for id in ids {
            pipe.get(self.keys.doc(*id));
        }
        let raw: Vec<Option<String>> = pipe.query_async(conn).await?;

        raw.into_iter()
            .flatten()
            .map(|json| serde_json::from_str(&json).map_err(IndexError::from))
            .collect()
    }

    async fn matching(&self, query: &str) -> Result<Vec<E>, IndexError> {
        let mut conn = self.conn.clone();
        let ids = self.matching_ids(&mut conn, query).await?;
        debug!(hits = ids.len(), "Search index lookup");
        self.load(&mut conn, &ids).await
    }
}

#[async_trait]
impl<E: Entity> SearchIndex<E> for RedisSearchIndex<E> {
    #[instrument(skip_all, fields(entity = E::NAME, id = ?entity.id()))]
    async fn index(&self, entity: &E) -> Result<(), IndexError> {
        let id = entity.id().ok_or(IndexError::MissingId(E::NAME))?;
        let json = serde_json::to_string(entity)?;
        let tokens: Vec<String> = document_tokens(entity).into_iter().collect();

        let mut conn = self.conn.clone();
        let _: () = self
            .keys
            .invocation(&INDEX_SCRIPT, id)
            .arg(json)
            .arg(tokens)
            .invoke_async(&mut conn)
            .await?;

        Ok(())
    }

    #[instrument(skip(self), fields(entity = E::NAME))]
    async fn search(&self, query: &str) -> Result<Vec<E>, IndexError> {
        self.matching(query).await
    }

    #[instrument(skip(self, page), fields(entity = E::NAME))]
    async fn search_paged(&self, query: &str, page: &PageRequest) -> Result<Page<E>, IndexError> {
        let mut hits = self.matching(query).await?;
        sort_entities(&mut hits, &page.sort)?;
        Ok(Page::from_ordered(hits, page))
    }

    #[instrument(skip(self), fields(entity = E::NAME))]
    async fn delete_from_index_by_id(&self, id: i64) -> Result<(), IndexError> {
        let mut conn = self.conn.clone();
        let _: () = self
            .keys
            .invocation(&DELETE_SCRIPT, id)
            .invoke_async(&mut conn)
            .await?;

        Ok(())
    }
}
