use crate::push::types::RegistrationToken;

/// 设备激活子系统接口
///
/// 负责把注册 token 关联到后端的设备身份。调用方不等待结果，
/// 注册失败由实现自己处理。
pub trait DeviceActivation: Send + Sync {
    /// 收到新的注册 token
    fn on_new_registration_token(&self, token: RegistrationToken);
}
