//! 图片字节流去混淆
//!
//! 单字节异或。对原始响应体必须且只能应用一次；再应用一次会
//! 还原出混淆前的字节（异或同一密钥两次即恒等）。

/// 观测到的默认密钥；绑定站点当前协议版本，可由站点配置覆盖
pub const DEFAULT_IMAGE_KEY: u8 = 66;

/// 逐字节异或解码，输出与输入等长
pub fn xor_decode(input: &[u8], key: u8) -> Vec<u8> {
    input.iter().map(|byte| byte ^ key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_length_matches_input() {
        let input = vec![0u8; 1024];
        assert_eq!(xor_decode(&input, DEFAULT_IMAGE_KEY).len(), input.len());
        assert!(xor_decode(&[], DEFAULT_IMAGE_KEY).is_empty());
    }

    #[test]
    fn applying_twice_restores_original() {
        let input: Vec<u8> = (0..=255).collect();
        let once = xor_decode(&input, DEFAULT_IMAGE_KEY);
        assert_ne!(once, input);
        assert_eq!(xor_decode(&once, DEFAULT_IMAGE_KEY), input);
    }

    #[test]
    fn decodes_known_bytes() {
        // 'B' ^ 66 == 0
        assert_eq!(xor_decode(b"B", 66), vec![0]);
        assert_eq!(xor_decode(&[0, 1, 2], 66), vec![66, 67, 64]);
    }
}
