//! Login gating for protected views.
//!
//! Identity itself lives with an external provider. This module only
//! observes auth state through [`AuthStateSource`] and decides where the
//! user should be sent, remembering one redirect destination for the
//! duration of the session.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::debug;

pub const LOGIN_PAGE: &str = "login.html";
pub const DEFAULT_PAGE: &str = "dashboard.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub email: Option<String>,
}

type Observer = Arc<dyn Fn(Option<&User>) + Send + Sync>;

/// Something that reports sign-in / sign-out transitions.
pub trait AuthStateSource {
    fn current_user(&self) -> Option<User>;

    /// Registers `observer`. It is called once right away with the current
    /// state, then on every change until the returned handle is cancelled
    /// or dropped.
    fn subscribe(&self, observer: Box<dyn Fn(Option<&User>) + Send + Sync>) -> Subscription;
}

#[derive(Default)]
struct Registry {
    user: Option<User>,
    next_id: u64,
    observers: BTreeMap<u64, Observer>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle for a registered observer. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|r| lock(&r).observers.contains_key(&self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).observers.remove(&self.id);
            debug!(id = self.id, "Auth observer removed");
        }
    }
}

/// In-process [`AuthStateSource`]; the identity provider adapter pushes
/// state into it with [`AuthHub::set_user`].
#[derive(Clone, Default)]
pub struct AuthHub {
    registry: Arc<Mutex<Registry>>,
}

impl AuthHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user(&self, user: Option<User>) {
        let observers: Vec<Observer> = {
            let mut registry = lock(&self.registry);
            registry.user = user.clone();
            registry.observers.values().cloned().collect()
        };
        debug!(signed_in = user.is_some(), observers = observers.len(), "Auth state changed");
        for observer in observers {
            observer(user.as_ref());
        }
    }

    pub fn sign_out(&self) {
        self.set_user(None);
    }

    pub fn observer_count(&self) -> usize {
        lock(&self.registry).observers.len()
    }
}

impl AuthStateSource for AuthHub {
    fn current_user(&self) -> Option<User> {
        lock(&self.registry).user.clone()
    }

    fn subscribe(&self, observer: Box<dyn Fn(Option<&User>) + Send + Sync>) -> Subscription {
        let observer: Observer = Arc::from(observer);
        let (id, user) = {
            let mut registry = lock(&self.registry);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.observers.insert(id, observer.clone());
            (id, registry.user.clone())
        };
        observer(user.as_ref());
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }
}

/// Per-session storage; holds at most one post-login destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFlags {
    redirect_after_login: Option<String>,
}

impl SessionFlags {
    pub fn set_redirect(&mut self, url: &str) {
        self.redirect_after_login = Some(url.to_string());
    }

    pub fn redirect(&self) -> Option<&str> {
        self.redirect_after_login.as_deref()
    }

    /// Reads and clears the stored destination.
    pub fn take_redirect(&mut self) -> Option<String> {
        self.redirect_after_login.take()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Redirect(String),
}

/// Redirect policy for protected and login views.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    login_page: String,
    default_page: String,
    flags: SessionFlags,
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new(LOGIN_PAGE, DEFAULT_PAGE)
    }
}

impl SessionGuard {
    pub fn new(login_page: &str, default_page: &str) -> Self {
        Self {
            login_page: login_page.to_string(),
            default_page: default_page.to_string(),
            flags: SessionFlags::default(),
        }
    }

    pub fn flags(&self) -> &SessionFlags {
        &self.flags
    }

    /// On a protected view: anonymous users go to the login page and
    /// `current_url` is remembered.
    pub fn protect(&mut self, user: Option<&User>, current_url: &str) -> Navigation {
        if user.is_some() {
            return Navigation::Stay;
        }
        self.flags.set_redirect(current_url);
        Navigation::Redirect(self.login_page.clone())
    }

    /// On the login view: signed-in users go back where they came from,
    /// or to the default page.
    pub fn after_login(&mut self, user: Option<&User>) -> Navigation {
        if user.is_none() {
            return Navigation::Stay;
        }
        let target = self
            .flags
            .take_redirect()
            .unwrap_or_else(|| self.default_page.clone());
        Navigation::Redirect(target)
    }
}

/// Applies [`SessionGuard::protect`] on every auth change for a protected
/// view, calling `navigate` on redirects.
pub fn watch_protected<S, F>(
    source: &S,
    guard: Arc<Mutex<SessionGuard>>,
    current_url: &str,
    navigate: F,
) -> Subscription
where
    S: AuthStateSource + ?Sized,
    F: Fn(Navigation) + Send + Sync + 'static,
{
    let current_url = current_url.to_string();
    source.subscribe(Box::new(move |user: Option<&User>| {
        let nav = guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .protect(user, &current_url);
        if nav != Navigation::Stay {
            navigate(nav);
        }
    }))
}

/// Applies [`SessionGuard::after_login`] on every auth change for the
/// login view, calling `navigate` on redirects.
pub fn watch_login<S, F>(source: &S, guard: Arc<Mutex<SessionGuard>>, navigate: F) -> Subscription
where
    S: AuthStateSource + ?Sized,
    F: Fn(Navigation) + Send + Sync + 'static,
{
    source.subscribe(Box::new(move |user: Option<&User>| {
        let nav = guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .after_login(user);
        if nav != Navigation::Stay {
            navigate(nav);
        }
    }))
}
