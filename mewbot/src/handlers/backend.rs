//! Administration des interfaces musicales

use crate::errors::Result;
use crate::handlers::arg;
use crate::orchestrator::Orchestrator;
use crate::reply::colored;
use crate::session::Sender;

pub fn show_apis(bot: &mut Orchestrator, _sender: &Sender, _args: &[String]) -> Result<()> {
    let selector = bot.selector();
    let active = selector.active_id();
    let mut text = "[b][color=blue]接口状态[/color]\n".to_string();
    for (rank, backend) in selector.ranked().into_iter().enumerate() {
        let status = if backend.available {
            colored("green", "Available")
        } else {
            colored("red", "Unavailable")
        };
        text.push_str(&format!(
            "[{}]\tId: {}\tApiType: {}\tPriority: {}\tStatus: {}\t",
            rank + 1,
            backend.id,
            backend.handle.kind(),
            backend.priority,
            status
        ));
        if active == Some(backend.id.as_str()) {
            text.push_str("\t<=正在使用");
        }
        text.push('\n');
    }
    bot.send(&text)
}

pub fn set_priority(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let id = arg(args, 0);
    if id.is_empty() {
        return bot.send("请输入接口Id。");
    }
    let raw = arg(args, 1);
    if raw.is_empty() {
        return bot.send("请输入需要修改的优先级大小。");
    }
    let Ok(priority) = raw.trim().parse::<i32>() else {
        return bot.send("请输入数字。");
    };
    bot.selector_mut().set_priority(id, priority)?;
    bot.success("修改成功。")
}

pub fn update_apis(bot: &mut Orchestrator, sender: &Sender, args: &[String]) -> Result<()> {
    bot.refresh_backends();
    bot.success("刷新接口成功。")?;
    show_apis(bot, sender, args)
}
