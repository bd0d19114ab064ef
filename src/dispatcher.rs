//! Runs the handler for a [`Resolution`].
//!
//! A usage fallback prints usage for the deepest matched node. A route runs
//! exactly one handler, which asks the API for what it needs, prompts for
//! values missing from the command line and prints one block of output.
//!
//! Requests the API explicitly turns down end the flow with a red message
//! and still count as a normal exit. Anything else propagates as a
//! [`CliError`](crate::error::CliError).

use colored::Color;

use crate::{
    Res,
    api::{Api, ApiError},
    config::ConfigStore,
    failure,
    grammar::Action,
    output::Printer,
    prompt::Prompt,
    render,
    resolver::{Resolution, ResolvedRoute},
    stats, success,
    utils::FRIEND_CODE_PREFIX,
};

/// Runs resolved commands against its collaborators.
///
/// The dispatcher owns no state of its own. Everything it reads or writes
/// goes through the three trait objects it borrows, so the same handlers run
/// against the HTTP client and terminal in the binary and against in-memory
/// fakes in tests.
///
/// # Example
///
/// ```
/// let grammar = Grammar::build()?;
/// let resolution = Resolver::new(&grammar).resolve(&invocation);
///
/// let mut store = FileConfig::load(None)?;
/// let mut api = ApiClient::new(&store.config(), false, out)?;
/// let mut prompt = TerminalPrompt;
///
/// Dispatcher::new(&mut api, &mut prompt, &mut store, out).dispatch(resolution)?;
/// ```
pub struct Dispatcher<'a> {
    api: &'a mut dyn Api,
    prompt: &'a mut dyn Prompt,
    config: &'a mut dyn ConfigStore,
    out: Printer,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        api: &'a mut dyn Api,
        prompt: &'a mut dyn Prompt,
        config: &'a mut dyn ConfigStore,
        out: Printer,
    ) -> Self {
        Self {
            api,
            prompt,
            config,
            out,
        }
    }

    /// Prints usage for a fallback, runs the handler for a route.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::run`]. A usage fallback never fails.
    pub fn dispatch(&mut self, resolution: Resolution) -> Res<()> {
        match resolution {
            Resolution::Usage(fallback) => {
                println!("{}", render::usage(&fallback, &self.out));
                Ok(())
            }
            Resolution::Route(route) => self.run(&route),
        }
    }

    /// Runs the handler for `route`'s action.
    ///
    /// Values the route does not carry, such as a missing username or any
    /// password, are asked for through the prompt. Fresh tokens from login,
    /// registration and `newToken` are written to the config store.
    ///
    /// # Errors
    ///
    /// - [`CliError::Api`](crate::error::CliError::Api) for transport
    ///   failures, unexpected statuses and missing credentials. Requests the
    ///   API explicitly rejects are printed instead and return `Ok(())`.
    /// - [`CliError::Prompt`](crate::error::CliError::Prompt) when input
    ///   cannot be read.
    /// - [`CliError::Config`](crate::error::CliError::Config) when a new
    ///   token cannot be persisted.
    pub fn run(&mut self, route: &ResolvedRoute) -> Res<()> {
        match route.action {
            Action::ShowAccount => {
                let profile = self.api.get_profile()?;
                println!("{}", render::account(&profile, &self.out));
                Ok(())
            }
            Action::Login => self.login(route),
            Action::Register => self.register(route),
            Action::ShowToken => {
                let token = self.api.auth_token()?;
                println!("{}", self.out.paint(&token, Color::Magenta));
                Ok(())
            }
            Action::NewToken => {
                let token = self.api.rotate_auth_token()?;
                println!("{}", self.out.paint(&token, Color::Magenta));
                self.config.update_token(&token)?;
                Ok(())
            }
            Action::NewFriendCode => {
                let code = self.api.rotate_friend_code()?;
                let code = format!("{}{}", FRIEND_CODE_PREFIX, code);
                println!("{}", self.out.paint(&code, Color::Magenta));
                Ok(())
            }
            Action::ChangePassword => self.change_password(),
            Action::ShowStatistics | Action::TopStatistics | Action::UserStatistics => {
                self.statistics(route)
            }
            Action::ListFriends => self.list_friends(route),
            Action::AddFriend => self.add_friend(route),
            Action::RemoveFriend => self.remove_friend(route),
        }
    }

    /// The route's positional argument, or a prompt for it.
    fn argument_or_prompt(&mut self, route: &ResolvedRoute, label: &str) -> Res<String> {
        match route.argument.as_deref().filter(|a| !a.is_empty()) {
            Some(argument) => Ok(argument.to_string()),
            None => Ok(self.prompt.ask_text(label)?),
        }
    }

    /// Splits a rejection off the result: it is reported under `label` and
    /// the flow ends normally with `None`.
    fn accepted<T>(&self, label: &str, result: Result<T, ApiError>) -> Res<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(ApiError::Rejected(message)) => {
                self.out.rejection(label, &message);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn login(&mut self, route: &ResolvedRoute) -> Res<()> {
        let username = self.argument_or_prompt(route, "Username")?;

        if let Ok(profile) = self.api.get_profile() {
            if profile.username == username {
                failure!(self.out, "You're already signed in on given account.");
                return Ok(());
            }
        }

        let password = self.prompt.ask_secret("Password")?;
        let result = self.api.login(&username, &password);
        drop(password);

        if let Some(auth) = self.accepted("Login failed", result)? {
            success!(self.out, "Login succeeded and credentials were saved!");
            self.config.update_token(&auth.auth_token)?;
        }
        Ok(())
    }

    fn register(&mut self, route: &ResolvedRoute) -> Res<()> {
        let username = self.argument_or_prompt(route, "New username")?;

        let password = self.prompt.ask_secret("Password")?;
        let result = self.api.register(&username, &password);
        drop(password);

        if let Some(auth) = self.accepted("Registration failed", result)? {
            success!(self.out, "Registration succeeded and credentials were saved!");
            self.config.update_token(&auth.auth_token)?;
        }
        Ok(())
    }

    fn change_password(&mut self) -> Res<()> {
        let old = self.prompt.ask_secret("Old password")?;
        let new = self.prompt.ask_secret("New password")?;
        let result = self.api.change_password(&old, &new);
        drop((old, new));

        if self.accepted("Password change failed", result)?.is_some() {
            success!(self.out, "Password was changed!");
        }
        Ok(())
    }

    fn statistics(&mut self, route: &ResolvedRoute) -> Res<()> {
        let stats = self.api.get_statistics(
            route.bound_value("user"),
            route.show_top,
            route.time_filter,
        )?;
        println!(
            "{}",
            render::statistics(&stats, route.show_top, route.active_column, &self.out)
        );
        Ok(())
    }

    fn list_friends(&mut self, route: &ResolvedRoute) -> Res<()> {
        let me = self.api.get_statistics(None, false, route.time_filter)?;
        let friends = self.api.get_friends()?;

        let ranked = stats::rank_friends(
            stats::with_self(friends, &me, route.friends_window),
            route.friends_window,
        );
        println!(
            "{}",
            render::friends(&ranked, route.friends_window, &me.username, &self.out)
        );
        Ok(())
    }

    fn add_friend(&mut self, route: &ResolvedRoute) -> Res<()> {
        let code = self.argument_or_prompt(route, "Friend code")?;
        let result = self.api.add_friend(&code);

        if let Some(friend) = self.accepted("Friend left unadded", result)? {
            success!(self.out, "Friend added!");
            println!("{}", render::friend(&friend));
        }
        Ok(())
    }

    fn remove_friend(&mut self, route: &ResolvedRoute) -> Res<()> {
        let username = self.argument_or_prompt(route, "Friend name")?;
        let result = self.api.remove_friend(&username);

        if self.accepted("Friend left unremoved", result)?.is_some() {
            success!(self.out, "Friend removed!");
        }
        Ok(())
    }
}
