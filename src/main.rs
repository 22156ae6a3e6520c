// ==========================================
// 相机参数模型 - 命令行入口
// ==========================================
// 用法:
//   picam-params                      打印默认参数集（JSON + 查询串）
//   picam-params decode <query>       解析查询串并打印参数集
//   picam-params profiles             列出已保存的档案
//   picam-params show <profile_id>    打印档案对应的参数集
//   picam-params save <profile_id> <query>
//                                     将查询串保存为档案
// ==========================================

use anyhow::{bail, Context, Result};
use picam_params::config::{CameraProfile, ProfileManager, ProfileReader};
use picam_params::{logging, ParameterSet, TextEncoding};

fn print_set(set: &ParameterSet) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&set.as_dict())?);
    let query = set.urlencode(TextEncoding::Utf8)?;
    println!("{}", String::from_utf8_lossy(&query));
    Ok(())
}

fn decode(query: &str) -> Result<ParameterSet> {
    let mut set = ParameterSet::from_query(query.as_bytes(), TextEncoding::Utf8)
        .context("无法解析查询串")?;
    let dropped = set.validate();
    if !dropped.is_empty() {
        tracing::warn!("Dropped parameters: {:?}", dropped);
    }
    set.cross_verify();
    Ok(set)
}

fn main() -> Result<()> {
    logging::init();

    tracing::info!("{} v{}", picam_params::APP_NAME, picam_params::VERSION);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        [] => print_set(&ParameterSet::with_defaults()?)?,
        ["decode", query] => print_set(&decode(query)?)?,
        ["profiles"] => {
            let manager = ProfileManager::open_default()?;
            for id in manager.list()? {
                println!("{}", id);
            }
        }
        ["show", profile_id] => {
            let manager = ProfileManager::open_default()?;
            print_set(&manager.build_parameter_set(profile_id)?)?;
        }
        ["save", profile_id, query] => {
            let set = decode(query)?;
            let manager = ProfileManager::open_default()?;
            let profile = CameraProfile::from_parameter_set(*profile_id, *profile_id, &set);
            let stored = manager.save(&profile)?;
            println!(
                "已保存档案 {} -> {}",
                stored.profile_id,
                manager.dir().display()
            );
        }
        _ => bail!("未知命令: {}", args.join(" ")),
    }

    Ok(())
}
