//! Navigation shell.
//!
//! A static route table mapping paths to the application's views. The shell
//! holds no state; rendering is left to whoever consumes the resolved
//! [`Route`].

use std::fmt;

use serde::Serialize;

/// A view reachable from the navigation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Landing page.
    Home,
    /// The student creation form.
    CreateStudent,
    /// The student list.
    ListStudents,
    /// The course list.
    ListCourses,
}

impl Route {
    /// Every route, in menu order.
    pub const ALL: [Self; 4] = [
        Self::Home,
        Self::CreateStudent,
        Self::ListStudents,
        Self::ListCourses,
    ];

    /// The path this route is served under.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::CreateStudent => "/aluno/criar",
            Self::ListStudents => "/aluno/listar",
            Self::ListCourses => "/cursos/listar",
        }
    }

    /// Menu label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::CreateStudent => "Criar",
            Self::ListStudents => "Listar",
            Self::ListCourses => "Curso",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    /// Where the link points.
    pub route: Route,
    /// Link text.
    pub label: &'static str,
    /// Path of the route.
    pub path: &'static str,
}

/// The application's navigation menu.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationShell;

impl NavigationShell {
    /// Brand text shown before the menu.
    pub const BRAND: &'static str = "CRUD";

    /// Title of the dropdown holding the student links.
    pub const MENU_TITLE: &'static str = "Aluno";

    /// Resolve a path to a route.
    ///
    /// A single trailing slash is ignored, so `/aluno/criar/` resolves like
    /// `/aluno/criar`. Unknown paths resolve to `None`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<Route> {
        let path = path.trim();
        let normalized = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };
        Route::ALL.into_iter().find(|r| r.path() == normalized)
    }

    /// The home link followed by the dropdown entries.
    #[must_use]
    pub fn links(&self) -> Vec<NavLink> {
        Route::ALL
            .into_iter()
            .map(|route| NavLink {
                route,
                label: route.label(),
                path: route.path(),
            })
            .collect()
    }

    /// Render the menu as plain text, one entry per line.
    #[must_use]
    pub fn render_menu(&self) -> String {
        let mut out = format!("{}\n", Self::BRAND);
        for link in self.links() {
            if link.route == Route::Home {
                out.push_str(&format!("  {:<8} {}\n", link.label, link.path));
            } else {
                out.push_str(&format!(
                    "  {} > {:<8} {}\n",
                    Self::MENU_TITLE,
                    link.label,
                    link.path
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_paths() {
        let shell = NavigationShell;
        assert_eq!(shell.resolve("/"), Some(Route::Home));
        assert_eq!(shell.resolve("/aluno/criar"), Some(Route::CreateStudent));
        assert_eq!(shell.resolve("/aluno/listar"), Some(Route::ListStudents));
        assert_eq!(shell.resolve("/cursos/listar"), Some(Route::ListCourses));
    }

    #[test]
    fn test_resolve_trailing_slash() {
        let shell = NavigationShell;
        assert_eq!(shell.resolve("/aluno/criar/"), Some(Route::CreateStudent));
        assert_eq!(shell.resolve(" /cursos/listar "), Some(Route::ListCourses));
    }

    #[test]
    fn test_resolve_unknown_paths() {
        let shell = NavigationShell;
        assert_eq!(shell.resolve("/aluno/editar"), None);
        assert_eq!(shell.resolve("aluno/criar"), None);
        assert_eq!(shell.resolve(""), None);
    }

    #[test]
    fn test_paths_round_trip_through_resolve() {
        let shell = NavigationShell;
        for route in Route::ALL {
            assert_eq!(shell.resolve(route.path()), Some(route));
        }
    }

    #[test]
    fn test_links_in_menu_order() {
        let labels: Vec<_> = NavigationShell.links().iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Home", "Criar", "Listar", "Curso"]);
    }

    #[test]
    fn test_render_menu() {
        let menu = NavigationShell.render_menu();
        assert!(menu.starts_with("CRUD\n"));
        assert!(menu.contains("Aluno > Criar"));
        assert!(menu.contains("/cursos/listar"));
        assert_eq!(menu.lines().count(), 5);
    }
}
