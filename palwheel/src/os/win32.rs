//! Win32 screen picking.
//!
//! A dedicated thread owns the low-level mouse and keyboard hooks and the preview popup, and pumps
//! their messages. Hook procedures have no context pointer, so the live [`PickHandoff`] and the
//! preview handle are reachable through statics, which only that thread and [`Win32Backend`] touch.

use std::sync::{
    atomic::{AtomicBool, AtomicIsize, Ordering},
    Arc,
};

use palwheel_core::{
    color::Rgb8,
    picker::{BackendError, PickHandoff, PickerBackend, PixelSource, PreviewBitmap, ScreenPoint},
};
use parking_lot::Mutex;
use windows::{
    core::w,
    Win32::{
        Foundation::{COLORREF, FALSE, HINSTANCE, HWND, LPARAM, LRESULT, POINT, WPARAM},
        Graphics::Gdi::{
            BeginPaint, EndPaint, GetDC, GetPixel, InvalidateRect, ReleaseDC, SetDIBitsToDevice,
            BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, PAINTSTRUCT,
        },
        System::{LibraryLoader::GetModuleHandleW, Threading::GetCurrentThreadId},
        UI::{
            Input::KeyboardAndMouse::VK_ESCAPE,
            WindowsAndMessaging::{
                CallNextHookEx, CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW,
                GetCursorPos, GetMessageW, PostMessageW, PostThreadMessageW, RegisterClassExW,
                SetLayeredWindowAttributes, SetWindowPos, SetWindowsHookExW, TranslateMessage,
                UnhookWindowsHookEx, HC_ACTION, HHOOK, HWND_TOPMOST, KBDLLHOOKSTRUCT, LWA_ALPHA,
                MSG, MSLLHOOKSTRUCT, SWP_NOACTIVATE, SWP_SHOWWINDOW, WH_KEYBOARD_LL, WH_MOUSE_LL,
                WM_APP, WM_KEYDOWN, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_PAINT, WM_QUIT,
                WM_RBUTTONDOWN, WM_RBUTTONUP, WM_SYSKEYDOWN, WNDCLASSEXW, WS_EX_LAYERED,
                WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
            },
        },
    },
};

/// Posted to the preview window. `wparam` and `lparam` carry the new screen x and y.
const WM_PREVIEW_MOVE: u32 = WM_APP + 1;
/// `GetPixel` failure sentinel.
const CLR_INVALID: u32 = 0xFFFF_FFFF;
const PREVIEW_ALPHA: u8 = 235;

static HOOK_HANDOFF: Mutex<Option<Arc<PickHandoff>>> = parking_lot::const_mutex(None);
static PREVIEW_BITMAP: Mutex<Option<PreviewBitmap>> = parking_lot::const_mutex(None);
static PREVIEW_HWND: AtomicIsize = AtomicIsize::new(0);
/// A down event was swallowed, so swallow its matching up too.
static SWALLOW_LEFT_UP: AtomicBool = AtomicBool::new(false);
static SWALLOW_RIGHT_UP: AtomicBool = AtomicBool::new(false);

/// Screen reads through the desktop DC.
#[derive(Default, Debug)]
pub struct GdiPixels;
impl PixelSource for GdiPixels {
    fn cursor_position(&self) -> Result<ScreenPoint, BackendError> {
        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point) }.map_err(|_| BackendError::Cursor)?;
        Ok(ScreenPoint::new(point.x, point.y))
    }
    fn sample(&self, point: ScreenPoint) -> Result<Rgb8, BackendError> {
        let failed = BackendError::Sample {
            x: point.x,
            y: point.y,
        };
        // Safety: the screen DC is released on every path before returning.
        let color = unsafe {
            let hdc = GetDC(HWND::default());
            if hdc.is_invalid() {
                return Err(failed);
            }
            let color = GetPixel(hdc, point.x, point.y);
            let _ = ReleaseDC(HWND::default(), hdc);
            color
        };
        if color.0 == CLR_INVALID {
            return Err(failed);
        }
        // COLORREF is 0x00BBGGRR.
        let [r, g, b, _] = color.0.to_le_bytes();
        Ok(Rgb8::new(r, g, b))
    }
}

struct HookThread {
    thread_id: u32,
    join: std::thread::JoinHandle<()>,
}

#[derive(Default)]
pub struct Win32Backend {
    thread: Option<HookThread>,
    pixels: GdiPixels,
}
impl Win32Backend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
impl PickerBackend for Win32Backend {
    fn install(&mut self, handoff: Arc<PickHandoff>) -> Result<(), BackendError> {
        if self.thread.is_some() {
            return Ok(());
        }
        *HOOK_HANDOFF.lock() = Some(handoff);
        SWALLOW_LEFT_UP.store(false, Ordering::Relaxed);
        SWALLOW_RIGHT_UP.store(false, Ordering::Relaxed);

        let (ready_send, ready_recv) = std::sync::mpsc::sync_channel(1);
        let join = std::thread::Builder::new()
            .name("palwheel-picker".into())
            .spawn(move || hook_thread(&ready_send))
            .map_err(|err| BackendError::Hook(err.to_string()))?;

        match ready_recv.recv() {
            Ok(Ok(thread_id)) => {
                self.thread = Some(HookThread { thread_id, join });
                Ok(())
            }
            Ok(Err(err)) => {
                let _ = join.join();
                HOOK_HANDOFF.lock().take();
                Err(err)
            }
            Err(_) => {
                let _ = join.join();
                HOOK_HANDOFF.lock().take();
                Err(BackendError::ThreadGone)
            }
        }
    }
    fn uninstall(&mut self) {
        let Some(HookThread { thread_id, join }) = self.thread.take() else {
            return;
        };
        if let Err(err) = unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) } {
            log::warn!("failed to stop picker thread: {err}");
        }
        if join.join().is_err() {
            log::warn!("picker thread panicked");
        }
        HOOK_HANDOFF.lock().take();
        PREVIEW_BITMAP.lock().take();
    }
    fn is_installed(&self) -> bool {
        self.thread.is_some()
    }
    fn update_preview(
        &mut self,
        top_left: ScreenPoint,
        bitmap: &PreviewBitmap,
    ) -> Result<(), BackendError> {
        let hwnd = PREVIEW_HWND.load(Ordering::Acquire);
        if hwnd == 0 {
            return Err(BackendError::Preview("no preview window".into()));
        }
        *PREVIEW_BITMAP.lock() = Some(bitmap.clone());
        // Executed on the hook thread, which owns the window.
        unsafe {
            PostMessageW(
                HWND(hwnd as *mut std::ffi::c_void),
                WM_PREVIEW_MOVE,
                WPARAM(top_left.x as isize as usize),
                LPARAM(top_left.y as isize),
            )
        }
        .map_err(|err| BackendError::Preview(err.to_string()))
    }
    fn pixels(&self) -> &dyn PixelSource {
        &self.pixels
    }
}
impl Drop for Win32Backend {
    fn drop(&mut self) {
        self.uninstall();
    }
}

/// Body of the hook thread. Reports its thread id (or why setup failed) through `ready`, then
/// pumps messages until `WM_QUIT`.
fn hook_thread(ready: &std::sync::mpsc::SyncSender<Result<u32, BackendError>>) {
    let setup = unsafe { setup_thread() };
    let (mouse, keyboard, hwnd) = match setup {
        Ok(handles) => handles,
        Err(err) => {
            let _ = ready.send(Err(err));
            return;
        }
    };
    let _ = ready.send(Ok(unsafe { GetCurrentThreadId() }));

    unsafe {
        let mut msg = MSG::default();
        // 0 on WM_QUIT, -1 on error.
        while GetMessageW(&mut msg, HWND::default(), 0, 0).0 > 0 {
            let _ = TranslateMessage(&msg);
            let _ = DispatchMessageW(&msg);
        }

        let _ = UnhookWindowsHookEx(mouse);
        let _ = UnhookWindowsHookEx(keyboard);
        PREVIEW_HWND.store(0, Ordering::Release);
        let _ = DestroyWindow(hwnd);
    }
    log::debug!("picker thread exiting");
}

unsafe fn setup_thread() -> Result<(HHOOK, HHOOK, HWND), BackendError> {
    let instance: HINSTANCE = GetModuleHandleW(None)
        .map_err(|err| BackendError::Hook(err.to_string()))?
        .into();
    let class_name = w!("PalwheelPickPreview");

    static REGISTER: std::sync::Once = std::sync::Once::new();
    REGISTER.call_once(|| {
        let class = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            lpfnWndProc: Some(preview_proc),
            hInstance: instance,
            lpszClassName: class_name,
            ..Default::default()
        };
        if RegisterClassExW(&class) == 0 {
            log::warn!("preview window class registration failed");
        }
    });

    let hwnd = CreateWindowExW(
        WS_EX_LAYERED | WS_EX_TOPMOST | WS_EX_TOOLWINDOW | WS_EX_TRANSPARENT | WS_EX_NOACTIVATE,
        class_name,
        w!(""),
        WS_POPUP,
        0,
        0,
        PreviewBitmap::WIDTH as i32,
        PreviewBitmap::HEIGHT as i32,
        None,
        None,
        instance,
        None,
    )
    .map_err(|err| BackendError::Preview(err.to_string()))?;
    let _ = SetLayeredWindowAttributes(hwnd, COLORREF(0), PREVIEW_ALPHA, LWA_ALPHA);
    PREVIEW_HWND.store(hwnd.0 as isize, Ordering::Release);

    let hooks = SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook), instance, 0).and_then(|mouse| {
        match SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook), instance, 0) {
            Ok(keyboard) => Ok((mouse, keyboard)),
            Err(err) => {
                let _ = UnhookWindowsHookEx(mouse);
                Err(err)
            }
        }
    });
    match hooks {
        Ok((mouse, keyboard)) => Ok((mouse, keyboard, hwnd)),
        Err(err) => {
            PREVIEW_HWND.store(0, Ordering::Release);
            let _ = DestroyWindow(hwnd);
            Err(BackendError::Hook(err.to_string()))
        }
    }
}

fn current_handoff() -> Option<Arc<PickHandoff>> {
    HOOK_HANDOFF.lock().clone()
}

unsafe extern "system" fn mouse_hook(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 {
        match wparam.0 as u32 {
            WM_LBUTTONDOWN => {
                let info = &*(lparam.0 as *const MSLLHOOKSTRUCT);
                let point = ScreenPoint::new(info.pt.x, info.pt.y);
                if current_handoff().is_some_and(|handoff| handoff.capture(point, &GdiPixels)) {
                    SWALLOW_LEFT_UP.store(true, Ordering::Relaxed);
                    return LRESULT(1);
                }
            }
            WM_RBUTTONDOWN => {
                if current_handoff().is_some_and(|handoff| handoff.cancel()) {
                    SWALLOW_RIGHT_UP.store(true, Ordering::Relaxed);
                    return LRESULT(1);
                }
            }
            WM_LBUTTONUP if SWALLOW_LEFT_UP.swap(false, Ordering::Relaxed) => return LRESULT(1),
            WM_RBUTTONUP if SWALLOW_RIGHT_UP.swap(false, Ordering::Relaxed) => return LRESULT(1),
            _ => (),
        }
    }
    CallNextHookEx(HHOOK::default(), code, wparam, lparam)
}

unsafe extern "system" fn keyboard_hook(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 && matches!(wparam.0 as u32, WM_KEYDOWN | WM_SYSKEYDOWN) {
        let info = &*(lparam.0 as *const KBDLLHOOKSTRUCT);
        if info.vkCode == u32::from(VK_ESCAPE.0)
            && current_handoff().is_some_and(|handoff| handoff.cancel())
        {
            return LRESULT(1);
        }
    }
    CallNextHookEx(HHOOK::default(), code, wparam, lparam)
}

unsafe extern "system" fn preview_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_PREVIEW_MOVE => {
            let x = wparam.0 as isize as i32;
            let y = lparam.0 as i32;
            let _ = SetWindowPos(
                hwnd,
                HWND_TOPMOST,
                x,
                y,
                PreviewBitmap::WIDTH as i32,
                PreviewBitmap::HEIGHT as i32,
                SWP_NOACTIVATE | SWP_SHOWWINDOW,
            );
            let _ = InvalidateRect(hwnd, None, FALSE);
            LRESULT(0)
        }
        WM_PAINT => {
            let mut paint = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut paint);
            if let Some(bitmap) = PREVIEW_BITMAP.lock().as_ref() {
                let info = BITMAPINFO {
                    bmiHeader: BITMAPINFOHEADER {
                        biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                        biWidth: bitmap.width() as i32,
                        // Negative for top-down rows.
                        biHeight: -(bitmap.height() as i32),
                        biPlanes: 1,
                        biBitCount: 32,
                        biCompression: BI_RGB.0,
                        ..Default::default()
                    },
                    ..Default::default()
                };
                SetDIBitsToDevice(
                    hdc,
                    0,
                    0,
                    bitmap.width(),
                    bitmap.height(),
                    0,
                    0,
                    0,
                    bitmap.height(),
                    bitmap.bgra().as_ptr().cast(),
                    &info,
                    DIB_RGB_COLORS,
                );
            }
            let _ = EndPaint(hwnd, &paint);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}
