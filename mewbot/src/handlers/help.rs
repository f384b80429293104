use crate::errors::Result;
use crate::orchestrator::Orchestrator;
use crate::reply::colored;
use crate::session::Sender;

pub fn help(bot: &mut Orchestrator, _sender: &Sender, _args: &[String]) -> Result<()> {
    let mut text = "[b][color=blue]食用方式[/color]\n".to_string();
    for command in bot.registry().commands() {
        let aliases = command.aliases.join("，");
        let examples = if command.examples.is_empty() {
            aliases.clone()
        } else {
            command.examples.join("，")
        };
        text.push_str(&format!(
            "{}\t功能：{}\t指令：{}\t例子：{}\n",
            command.help,
            command.name,
            colored("green", &aliases),
            examples
        ));
    }
    bot.send(&text)
}
