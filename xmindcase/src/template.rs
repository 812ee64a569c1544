//! Sample outline document showing the topic conventions.
//!
//! Two suites and three cases with priorities 1 to 3, a precondition note, and steps
//! with expected results. The CLI `template` command writes it to disk.

use crate::{
    Result,
    export::outline::export_outline,
    model::{Case, Step, Suite},
};

/// Root topic title of the sample document.
pub const SAMPLE_ROOT: &str = "系统测试模板";

/// The sample tree: one root suite.
pub fn sample_suites() -> Vec<Suite> {
    let mut admin_login = Case::new("管理员账号正常登录");
    admin_login.importance = 1;
    admin_login.preconditions = "账号已激活且拥有管理员权限".to_string();
    admin_login.steps = vec![
        Step::new(1, "访问登录页并输入管理员凭据", "页面跳转至后台管理面板"),
        Step::new(2, "点击右上角登出按钮", "成功返回登录页，Session 清除"),
    ];

    let mut wrong_password = Case::new("密码错误登录失败校验");
    wrong_password.importance = 2;
    wrong_password.steps = vec![Step::new(
        1,
        "输入正确的用户名和错误的密码",
        "提示'用户名或密码错误'，保持在登录页",
    )];

    let mut empty_search = Case::new("空关键词搜索");
    empty_search.importance = 3;
    empty_search.steps = vec![Step::new(
        1,
        "在搜索框不输入内容直接点击搜索",
        "显示全部结果或提示请输入关键词",
    )];

    let mut auth = Suite::new("用户权限模块");
    auth.details = "测试用户登录、登出及权限校验流程".to_string();
    auth.testcase_list = vec![admin_login, wrong_password];

    let mut search = Suite::new("搜索功能");
    search.testcase_list = vec![empty_search];

    let mut root = Suite::new(SAMPLE_ROOT);
    root.sub_suites = vec![auth, search];
    vec![root]
}

/// The sample tree as outline document bytes.
pub fn sample_outline() -> Result<Vec<u8>> {
    export_outline(&sample_suites())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ReaderConfig, reader::read_outline};

    #[test]
    fn sample_reads_back_with_three_cases() {
        let parsed = read_outline(&sample_outline().unwrap(), &ReaderConfig::default()).unwrap();
        assert_eq!(parsed.suites, sample_suites());
        let got: Vec<_> = parsed
            .cases
            .iter()
            .map(|c| (c.suite.as_str(), c.importance))
            .collect();
        assert_eq!(
            got,
            vec![("用户权限模块", 1), ("用户权限模块", 2), ("搜索功能", 3)]
        );
    }
}
