use crate::cli::{
    context::ShellContext, error::CommandResult, output, registry::CommandEntry,
};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "login",
            "Sign in as the operator recorded on new entries",
            "login [user]",
            cmd_login,
        ),
        CommandEntry::new("logout", "Sign the current operator out", "logout", cmd_logout),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(user_name) = args.first() else {
        match &context.operator {
            Some(operator) => output::info(format!("Signed in as `{}`.", operator.user_name)),
            None => output::info("Nobody is signed in."),
        }
        return Ok(());
    };
    let operator = context.sign_in(user_name)?;
    output::success(format!("Signed in as `{}`.", operator.user_name));
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.sign_out()? {
        Some(operator) => output::success(format!("Signed out `{}`.", operator.user_name)),
        None => output::info("Nobody is signed in."),
    }
    Ok(())
}
