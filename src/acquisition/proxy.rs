// Proxy selection - affects how a call is made, never what is decided

use rand::seq::SliceRandom;
use std::sync::Arc;

/// Picks the proxy for the next outbound call
pub trait ProxySelector: Send + Sync {
    fn select(&self) -> Option<String>;
}

/// Direct connection
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProxy;

impl ProxySelector for NoProxy {
    fn select(&self) -> Option<String> {
        None
    }
}

/// Always the same proxy
#[derive(Debug, Clone)]
pub struct FixedProxy(pub String);

impl ProxySelector for FixedProxy {
    fn select(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Uniformly random pick from a pool, per call
#[derive(Debug, Clone)]
pub struct RandomProxy {
    pool: Vec<String>,
}

impl RandomProxy {
    pub fn new(pool: Vec<String>) -> Self {
        Self { pool }
    }
}

impl ProxySelector for RandomProxy {
    fn select(&self) -> Option<String> {
        self.pool.choose(&mut rand::thread_rng()).cloned()
    }
}

/// Selector matching a configured pool size
pub fn selector_for(proxies: &[String]) -> Arc<dyn ProxySelector> {
    match proxies {
        [] => Arc::new(NoProxy),
        [only] => Arc::new(FixedProxy(only.clone())),
        pool => Arc::new(RandomProxy::new(pool.to_vec())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_for_pool_sizes() {
        assert_eq!(selector_for(&[]).select(), None);

        let one = vec!["socks5h://127.0.0.1:1080".to_string()];
        assert_eq!(selector_for(&one).select(), Some(one[0].clone()));

        let pool = vec![
            "http://10.0.0.1:3128".to_string(),
            "http://10.0.0.2:3128".to_string(),
            "http://10.0.0.3:3128".to_string(),
        ];
        let selector = selector_for(&pool);
        for _ in 0..20 {
            let picked = selector.select().unwrap();
            assert!(pool.contains(&picked));
        }
    }
}
