/// Usage examples appended to a subcommand's long help.
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

pub struct CommandExamples {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExamples] {
    &[
        CommandExamples {
            name: "index",
            groups: crate::commands::index::EXAMPLES,
        },
        CommandExamples {
            name: "convert",
            groups: crate::commands::convert::EXAMPLES,
        },
    ]
}
