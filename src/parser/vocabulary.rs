//! Command vocabulary
//!
//! Read-only tables describing the Redis command language:
//! - every single-word command name
//! - every container command and the sub-keywords that may follow it
//!   (`ACL GETUSER`, `CLUSTER COUNT-FAILURE-REPORTS`, ...)
//!
//! Nothing here is ever mutated. The flattened completion list is built
//! lazily on first use and then shared.

use std::sync::LazyLock;

/// Commands that take no sub-keyword.
const SINGLE_COMMANDS: &[&str] = &[
    "APPEND", "AUTH", "BGREWRITEAOF", "BGSAVE", "BITCOUNT", "BITFIELD", "BITFIELD_RO", "BITOP",
    "BITPOS", "BLMOVE", "BLPOP", "BRPOP", "BRPOPLPUSH", "BZPOPMAX", "BZPOPMIN", "COMMAND", "COPY",
    "DBSIZE", "DECR", "DECRBY", "DEL", "DISCARD", "DUMP", "ECHO", "EVAL", "EVALSHA", "EXEC",
    "EXISTS", "EXPIRE", "EXPIREAT", "FAILOVER", "FLUSHALL", "FLUSHDB", "GEOADD", "GEODIST",
    "GEOHASH", "GEOPOS", "GEORADIUS", "GEORADIUSBYMEMBER", "GEOSEARCH", "GEOSEARCHSTORE", "GET",
    "GETBIT", "GETDEL", "GETEX", "GETRANGE", "GETSET", "HDEL", "HELLO", "HEXISTS", "HGET",
    "HGETALL", "HINCRBY", "HINCRBYFLOAT", "HKEYS", "HLEN", "HMGET", "HMSET", "HRANDFIELD",
    "HSCAN", "HSET", "HSETNX", "HSTRLEN", "HVALS", "INCR", "INCRBY", "INCRBYFLOAT", "INFO",
    "KEYS", "LASTSAVE", "LINDEX", "LINSERT", "LLEN", "LMOVE", "LOLWUT", "LPOP", "LPOS", "LPUSH",
    "LPUSHX", "LRANGE", "LREM", "LSET", "LTRIM", "MGET", "MIGRATE", "MONITOR", "MOVE", "MSET",
    "MSETNX", "MULTI", "OBJECT", "PERSIST", "PEXPIRE", "PEXPIREAT", "PFADD", "PFCOUNT",
    "PFMERGE", "PING", "PSETEX", "PSUBSCRIBE", "PSYNC", "PTTL", "PUBLISH", "PUBSUB",
    "PUNSUBSCRIBE", "QUIT", "RANDOMKEY", "READONLY", "READWRITE", "RENAME", "RENAMENX",
    "REPLICAOF", "RESET", "RESTORE", "ROLE", "RPOP", "RPOPLPUSH", "RPUSH", "RPUSHX", "SADD",
    "SAVE", "SCAN", "SCARD", "SDIFF", "SDIFFSTORE", "SELECT", "SET", "SETBIT", "SETEX", "SETNX",
    "SETRANGE", "SHUTDOWN", "SINTER", "SINTERSTORE", "SISMEMBER", "SLAVEOF", "SLOWLOG",
    "SMEMBERS", "SMISMEMBER", "SMOVE", "SORT", "SPOP", "SRANDMEMBER", "SREM", "SSCAN", "STRALGO",
    "STRLEN", "SUBSCRIBE", "SUNION", "SUNIONSTORE", "SWAPDB", "SYNC", "TIME", "TOUCH", "TTL",
    "TYPE", "UNLINK", "UNSUBSCRIBE", "UNWATCH", "WAIT", "WATCH", "XACK", "XADD", "XAUTOCLAIM",
    "XCLAIM", "XDEL", "XGROUP", "XINFO", "XLEN", "XPENDING", "XRANGE", "XREAD", "XREADGROUP",
    "XREVRANGE", "XTRIM", "ZADD", "ZCARD", "ZCOUNT", "ZDIFF", "ZDIFFSTORE", "ZINCRBY", "ZINTER",
    "ZINTERSTORE", "ZLEXCOUNT", "ZMSCORE", "ZPOPMAX", "ZPOPMIN", "ZRANDMEMBER", "ZRANGE",
    "ZRANGEBYLEX", "ZRANGEBYSCORE", "ZRANGESTORE", "ZRANK", "ZREM", "ZREMRANGEBYLEX",
    "ZREMRANGEBYRANK", "ZREMRANGEBYSCORE", "ZREVRANGE", "ZREVRANGEBYLEX", "ZREVRANGEBYSCORE",
    "ZREVRANK", "ZSCAN", "ZSCORE", "ZUNION", "ZUNIONSTORE",
];

/// Container commands and the sub-keywords that complete them.
const MULTI_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "ACL",
        &[
            "LOAD", "SAVE", "LIST", "USERS", "GETUSER", "SETUSER", "DELUSER", "CAT", "GENPASS",
            "WHOAMI", "LOG", "HELP",
        ],
    ),
    (
        "CLIENT",
        &[
            "CACHING", "ID", "INFO", "KILL", "LIST", "GETNAME", "GETREDIR", "UNPAUSE", "PAUSE",
            "REPLY", "SETNAME", "TRACKING", "TRACKINGINFO", "UNBLOCK",
        ],
    ),
    (
        "CLUSTER",
        &[
            "ADDSLOTS", "BUMPEPOCH", "COUNT-FAILURE-REPORTS", "COUNTKEYSINSLOT", "DELSLOTS",
            "FAILOVER", "FLUSHSLOTS", "FORGET", "GETKEYSINSLOT", "INFO", "KEYSLOT", "MEET",
            "MYID", "NODES", "REPLICATE", "RESET", "SAVECONFIG", "SET-CONFIG-EPOCH", "SETSLOT",
            "SLAVES", "REPLICAS", "SLOTS",
        ],
    ),
    ("COMMAND", &["COUNT", "GETKEYS", "INFO"]),
    ("CONFIG", &["GET", "REWRITE", "SET", "RESETSTAT"]),
    ("DEBUG", &["OBJECT", "SEGFAULT"]),
    (
        "MEMORY",
        &["DOCTOR", "HELP", "MALLOC-STATS", "PURGE", "STATS", "USAGE"],
    ),
    ("MODULE", &["LIST", "LOAD", "UNLOAD"]),
    ("SCRIPT", &["DEBUG", "EXISTS", "FLUSH", "KILL", "LOAD"]),
    (
        "LATENCY",
        &["DOCTOR", "GRAPH", "HISTORY", "LATEST", "RESET", "HELP"],
    ),
];

/// Every completable command name, compound ones written as `"CMD SUB"`.
static ALL_COMMANDS: LazyLock<Vec<String>> = LazyLock::new(|| {
    let mut commands: Vec<String> = SINGLE_COMMANDS.iter().map(|c| c.to_string()).collect();
    for (command, subcommands) in MULTI_KEYWORDS {
        commands.extend(subcommands.iter().map(|sub| format!("{command} {sub}")));
    }
    commands.sort();
    commands.dedup();
    commands
});

/// Look up the sub-keywords valid after `command`.
///
/// The match is exact and case-sensitive.
pub fn subcommands(command: &str) -> Option<&'static [&'static str]> {
    MULTI_KEYWORDS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, subs)| *subs)
}

/// Check whether a single word names a command (ASCII case-insensitive).
pub fn is_command(word: &str) -> bool {
    SINGLE_COMMANDS
        .iter()
        .chain(MULTI_KEYWORDS.iter().map(|(name, _)| name))
        .any(|name| name.eq_ignore_ascii_case(word))
}

/// All command names available for completion, sorted.
pub fn commands() -> &'static [String] {
    &ALL_COMMANDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcommands_exact_match() {
        assert!(subcommands("ACL").unwrap().contains(&"GETUSER"));
        assert!(subcommands("acl").is_none());
        assert!(subcommands("GET").is_none());
    }

    #[test]
    fn test_is_command() {
        assert!(is_command("GET"));
        assert!(is_command("zadd"));
        assert!(is_command("ACL"));
        assert!(is_command("LATENCY"));
        assert!(!is_command("GETUSER"));
        assert!(!is_command("user:1"));
    }

    #[test]
    fn test_commands_include_compounds() {
        let all = commands();
        assert!(all.iter().any(|c| c == "ACL GETUSER"));
        assert!(all.iter().any(|c| c == "CLUSTER COUNT-FAILURE-REPORTS"));
        assert!(all.iter().any(|c| c == "GET"));
        // Containers that are not commands on their own stay out.
        assert!(!all.iter().any(|c| c == "ACL"));
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }
}
