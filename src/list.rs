//! 有序单链表。

use std::fmt;

use rand::Rng;

type Link = Option<Box<Node>>;

struct Node {
    value: i32,
    next: Link,
}

/// 按升序存放互不相同的整数的单链表。
///
/// 所有操作都是 O(n) 的顺序遍历，内部不做任何同步；
/// 并发访问需要由外层的锁（见 `lock` 模块）来保护。
///
/// ```rust
/// use listbench::SortedList;
/// let mut list = SortedList::new();
/// assert!(list.insert(3));
/// assert!(list.insert(1));
/// assert!(!list.insert(3));
/// assert!(list.contains(1));
/// assert_eq!(list.iter().collect::<Vec<_>>(), vec![1, 3]);
/// ```
#[derive(Default)]
pub struct SortedList {
    head: Link,
    len: usize,
}

impl SortedList {
    /// 创建一个空链表。
    pub fn new() -> SortedList {
        SortedList::default()
    }

    /// 判断 `value` 是否在链表中。
    ///
    /// 遇到第一个不小于 `value` 的节点即停止遍历。
    pub fn contains(&self, value: i32) -> bool {
        let mut curr = &self.head;
        while let Some(node) = curr {
            if node.value >= value {
                return node.value == value;
            }
            curr = &node.next;
        }
        false
    }

    /// 在有序位置插入 `value`。
    ///
    /// 如果值已经存在，链表保持不变并返回 `false`。
    pub fn insert(&mut self, value: i32) -> bool {
        let link = self.seek(value);
        if link.as_ref().map_or(false, |node| node.value == value) {
            return false;
        }
        let next = link.take();
        *link = Some(Box::new(Node { value, next }));
        self.len += 1;
        true
    }

    /// 删除 `value`，不存在时返回 `false`。
    pub fn delete(&mut self, value: i32) -> bool {
        let link = self.seek(value);
        if link.as_ref().map_or(true, |node| node.value != value) {
            return false;
        }
        if let Some(node) = link.take() {
            *link = node.next;
        }
        self.len -= 1;
        true
    }

    /// 链表是否为空。
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// 链表中元素的个数。
    pub fn len(&self) -> usize {
        self.len
    }

    /// 按升序遍历所有值。
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_ref().map(|node| &**node),
        }
    }

    /// 反复插入 `[0, value_range)` 内的随机值，直到链表恰好新增 `count` 个元素。
    ///
    /// 调用方需保证 `len() + count <= value_range`，否则循环无法结束。
    pub fn populate<R: Rng>(&mut self, count: usize, value_range: i32, rng: &mut R) {
        let target = self.len + count;
        while self.len < target {
            self.insert(rng.gen_range(0, value_range));
        }
    }

    // 返回第一个值不小于 `value` 的节点所在的链接
    fn seek(&mut self, value: i32) -> &mut Link {
        let mut link = &mut self.head;
        while link.as_ref().map_or(false, |node| node.value < value) {
            link = match link.as_mut() {
                Some(node) => &mut node.next,
                // 循环条件已保证非空
                None => unreachable!(),
            };
        }
        link
    }
}

impl Drop for SortedList {
    // 逐个释放节点，避免长链表递归 drop 导致栈溢出
    fn drop(&mut self) {
        let mut curr = self.head.take();
        while let Some(mut node) = curr {
            curr = node.next.take();
        }
    }
}

impl fmt::Debug for SortedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// `SortedList` 的升序迭代器。
pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        self.next.map(|node| {
            self.next = node.next.as_ref().map(|next| &**next);
            node.value
        })
    }
}
