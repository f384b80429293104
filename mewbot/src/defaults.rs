//! Table des commandes par défaut
//!
//! L'ordre compte : pour deux alias dont l'un préfixe l'autre, le plus long
//! doit être enregistré en premier (`歌单添加ID` avant `歌单添加`,
//! `删除宠物` avant `删除`).

use crate::command::{Command, CommandRegistry};

pub fn default_commands() -> Vec<Command> {
    vec![
        Command::new("play_id", &["播放ID"], "添加对应ID歌曲到当前歌单并播放")
            .with_examples(&["播放ID789798"]),
        Command::new("add_id", &["添加ID"], "添加对应ID歌曲到当前歌单")
            .with_examples(&["添加ID123456"]),
        Command::new("play", &["我想听", "我要听"], "自动搜索歌曲并添加到当前歌单")
            .with_examples(&["我想听爱情转移", "我要听爱情转移"]),
        Command::new("help", &["帮助", "怎么玩"], "显示帮助手册"),
        Command::new("chat", &["聊天"], "喵~~"),
        Command::new("search", &["搜索"], "搜索曲库歌曲").with_examples(&["搜索爱情转移", "搜索爱情转移 5"]),
        Command::new("pause", &["暂停"], "暂停"),
        Command::new("resume", &["继续播放"], "继续播放"),
        Command::new("jump", &["跳转"], "跳转到第N首歌曲").with_examples(&["跳转50"]),
        Command::new("volume", &["音量"], "调节音量。").with_examples(&["音量50"]),
        Command::new("clear", &["清空"], "清空当前歌单"),
        Command::new("next", &["下一首"], "下一首"),
        Command::new("previous", &["上一首"], "上一首"),
        Command::new("shuffle", &["打乱歌单"], "打乱当前歌单"),
        Command::new("remove_item_list", &["删除歌曲", "歌单删除"], "删除对应歌单ID的第x首歌")
            .with_examples(&["歌单删除1 12"]),
        Command::new("add_id_item_list", &["歌单添加ID"], "给对应歌单ID添加歌曲ID")
            .with_examples(&["歌单添加ID0 11321,3213213"]),
        Command::new("add_item_list", &["歌单添加"], "给对应歌单ID添加歌曲")
            .with_examples(&["歌单添加0 爱情转移，天天"]),
        Command::new("show_list", &["当前歌单", "歌单", "查看歌单"], "查看当前歌单或其他歌单")
            .with_examples(&["当前歌单", "歌单[歌单ID]", "歌单123", "查看歌单789"]),
        Command::new("list_list", &["所有歌单"], "查看所有歌单"),
        Command::new("play_list", &["播放歌单"], "播放对应歌单ID").with_examples(&["播放歌单123"]),
        Command::new("create_list", &["创建歌单", "新建歌单"], "创建一个空歌单")
            .with_examples(&["创建歌单123"]),
        Command::new("delete_list", &["删除歌单"], "删除对应歌单ID").with_examples(&["删除歌单13456"]),
        Command::new("save_current_list", &["保存歌单"], "保存当前播放歌单到新歌单"),
        Command::new("add", &["添加"], "自动搜索歌曲并添加到当前歌单").with_examples(&["添加Lemon"]),
        Command::new("play", &["播放"], "自动搜索歌曲并插入到当前歌单并播放")
            .with_examples(&["播放Lemon"]),
        Command::new("pet_delete", &["删除宠物", "抛弃宠物"], "删除宠物。"),
        Command::new("remove_item_current", &["删除"], "删除当前的第x首歌").with_examples(&["删除 12"]),
        Command::new("pet_new", &["创建宠物", "新建宠物"], "新建一只宠物。")
            .with_examples(&["创建宠物", "新建宠物"]),
        Command::new("pet_upgrade", &["升级", "宠物升级"], "宠物升级。"),
        Command::new("pet_show", &["宠物", "我的宠物", "查看宠物"], "查看宠物信息。"),
        Command::new("pet_feed", &["喂食", "喂食宠物", "喂宠物"], "喂宠物。")
            .with_examples(&["喂食", "喂食宠物", "喂宠物"]),
        Command::new("pet_battle_add", &["加入战斗"], "宠物加入战斗。"),
        Command::new("pet_battle_list", &["查看战斗", "战斗"], "宠物战斗。"),
        Command::new("pet_battle_start", &["开始战斗"], "宠物开始战斗。"),
        Command::new("checkin", &["签到"], "签到。"),
        Command::new("broadcast", &["广播"], "广播。").with_examples(&["广播你好", "广播你好 jlshim"]),
        Command::new("update_apis", &["刷新接口"], "刷新接口状态。"),
        Command::new("show_apis", &["接口"], "查看接口状态。"),
        Command::new("set_priority", &["修改接口"], "修改接口优先级。")
            .with_examples(&["修改接口 default 50"]),
    ]
}

pub fn default_registry() -> CommandRegistry {
    default_commands().into_iter().collect()
}
