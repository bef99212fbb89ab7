//! The fixed extraction instruction sent alongside every invoice image.
//!
//! The prompt is in Vietnamese — the domain language of the invoices — and
//! spells out the exact JSON object shape field by field: names, types, the
//! `DD/MM/YYYY` date convention, and the requirement that monetary and
//! quantity values come back as numbers rather than strings.

pub const INVOICE_EXTRACTION_PROMPT: &str = r#"Bạn là một trợ lý AI chuyên nghiệp trong việc đọc và trích xuất thông tin từ hóa đơn GTGT của Việt Nam.
Vui lòng phân tích hình ảnh hóa đơn được cung cấp và trả về thông tin dưới dạng một đối tượng JSON.
Đối tượng JSON phải có cấu trúc như sau, với các khóa bằng tiếng Việt như được chỉ định. Nếu một trường thông tin không có trên hóa đơn, hãy để giá trị là null hoặc bỏ qua trường đó trong JSON.

{
  "tenDonViBan": "string (Tên đơn vị bán hàng)",
  "maSoThueNguoiBan": "string (Mã số thuế người bán)",
  "diaChiNguoiBan": "string (Địa chỉ người bán)",
  "soHoaDon": "string (Số hóa đơn)",
  "kyHieuMauHoaDon": "string (Ký hiệu mẫu hóa đơn, ví dụ: 01GTKT0/001)",
  "kyHieuHoaDon": "string (Ký hiệu hóa đơn, ví dụ: AA/23E)",
  "ngayLap": "string (Ngày, tháng, năm lập hóa đơn, định dạng DD/MM/YYYY)",
  "tenDonViMua": "string (Tên đơn vị mua hàng)",
  "maSoThueNguoiMua": "string (Mã số thuế người mua)",
  "diaChiNguoiMua": "string (Địa chỉ người mua)",
  "hinhThucThanhToan": "string (Hình thức thanh toán, ví dụ: TM, CK)",
  "danhSachHangHoaDichVu": [
    {
      "stt": "string | number (Số thứ tự)",
      "tenHangHoaDichVu": "string (Tên hàng hóa, dịch vụ)",
      "donViTinh": "string (Đơn vị tính)",
      "soLuong": "number (Số lượng)",
      "donGia": "number (Đơn giá)",
      "thanhTien": "number (Thành tiền trước thuế)",
      "thueSuat": "string (Thuế suất GTGT, ví dụ '5%', '10%', 'KCT')"
    }
  ],
  "congTienHang": "number (Cộng tiền hàng trước thuế GTGT)",
  "tienThueGTGT": "number (Tổng tiền thuế GTGT)",
  "tongCongThanhToan": "number (Tổng cộng tiền thanh toán sau thuế)",
  "soTienVietBangChu": "string (Số tiền viết bằng chữ)",
  "ghiChu": "string (Ghi chú, nếu có)"
}

Chỉ trích xuất văn bản từ hóa đơn. Đảm bảo rằng các giá trị số (số lượng, đơn giá, thành tiền, v.v.) được trả về dưới dạng số (number), không phải chuỗi (string), trừ khi không thể chuyển đổi hoặc trường đó là STT. Ngày tháng phải ở định dạng DD/MM/YYYY.
"#;
