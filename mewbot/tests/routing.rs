use mewbot::{Command, CommandRegistry, default_registry};

fn fixture() -> CommandRegistry {
    vec![
        Command::new("next", &["下一首"], "下一首"),
        Command::new("jump", &["跳转"], "跳转"),
        Command::new("volume", &["音量", "调音量"], "音量"),
        Command::new("search", &["搜索"], "搜索"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_every_alias_routes_with_its_arguments() {
    let registry = fixture();
    for command in registry.commands() {
        for alias in &command.aliases {
            let route = registry.route(&format!("{} 12 abc", alias)).unwrap();
            assert_eq!(route.name, command.name);
            assert_eq!(&route.alias, alias);
            assert_eq!(route.args, vec!["12", "abc"]);
        }
    }
}

#[test]
fn test_empty_remainder_yields_one_empty_argument() {
    let route = fixture().route("下一首").unwrap();
    assert_eq!(route.args, vec![""]);

    let route = fixture().route("音量50").unwrap();
    assert_eq!(route.args, vec!["50"]);
}

#[test]
fn test_consecutive_spaces_yield_empty_arguments() {
    let route = fixture().route("搜索 晴天  3").unwrap();
    assert_eq!(route.args, vec!["晴天", "", "3"]);
}

#[test]
fn test_unknown_message_has_no_route() {
    assert!(fixture().route("你好").is_none());
    assert!(fixture().route("").is_none());
}

#[test]
fn test_colliding_aliases_first_registered_wins() {
    let registry: CommandRegistry = vec![
        Command::new("add_item_list", &["歌单添加"], ""),
        Command::new("add_id_item_list", &["歌单添加ID"], ""),
    ]
    .into_iter()
    .collect();
    let route = registry.route("歌单添加ID1 186016").unwrap();
    assert_eq!(route.name, "add_item_list");
    assert_eq!(route.args, vec!["ID1", "186016"]);

    let registry: CommandRegistry = vec![
        Command::new("first", &["播放"], ""),
        Command::new("second", &["播放"], ""),
    ]
    .into_iter()
    .collect();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.route("播放Lemon").unwrap().name, "first");
}

#[test]
fn test_default_table_routes_the_help_examples() {
    let registry = default_registry();
    let cases = [
        ("播放ID789798", "play_id"),
        ("我想听爱情转移", "play"),
        ("歌单删除1 12", "remove_item_list"),
        ("查看歌单789", "show_list"),
        ("修改接口 default 50", "set_priority"),
        ("喂宠物", "pet_feed"),
        ("开始战斗", "pet_battle_start"),
    ];
    for (message, name) in cases {
        assert_eq!(registry.route(message).unwrap().name, name, "{}", message);
    }
}
