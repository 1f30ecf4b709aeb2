use std::{convert::TryFrom, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    Favorite,
}

/// Page a route renders. Rendering itself belongs to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Favorite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: RouteName,
    pub path: &'static str,
    pub page: Page,
}

pub const ROUTES: &[Route] = &[
    Route { name: RouteName::Home, path: "/", page: Page::Home },
    Route { name: RouteName::Favorite, path: "/favorite", page: Page::Favorite },
];

impl RouteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Home => "Home",
            RouteName::Favorite => "Favorite",
        }
    }

    pub fn path(&self) -> &'static str {
        resolve(*self).path
    }

    pub const fn all() -> &'static [RouteName] {
        &[RouteName::Home, RouteName::Favorite]
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RouteName {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "home" => Ok(RouteName::Home),
            "favorite" => Ok(RouteName::Favorite),
            _ => Err(anyhow::anyhow!(
                "Unknown route '{value}'. Supported routes: home (/), favorite (/favorite)."
            )),
        }
    }
}

/// Look up the route registered under `name`.
pub fn resolve(name: RouteName) -> &'static Route {
    match name {
        RouteName::Home => &ROUTES[0],
        RouteName::Favorite => &ROUTES[1],
    }
}

/// Exact path match; no parameters or trailing-slash normalization.
pub fn match_path(path: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|r| r.path == path)
}

/// Accepts either a route name or a path.
pub fn find(target: &str) -> anyhow::Result<&'static Route> {
    if target.starts_with('/') {
        return match_path(target).ok_or_else(|| {
            anyhow::anyhow!("No page at path '{target}'. Known paths: /, /favorite.")
        });
    }

    RouteName::try_from(target).map(resolve)
}
