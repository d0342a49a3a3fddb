pub struct DefaultConfig;

impl DefaultConfig {
    /// 默认并发摘要任务数
    pub fn default_workers() -> usize {
        20
    }

    /// 路径队列的默认容量
    pub fn default_queue_size() -> usize {
        64
    }

    /// 配置目录下本工具使用的子目录名
    pub fn app_dir_name() -> &'static str {
        "md5-tree"
    }
}
